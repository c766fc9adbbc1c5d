//! # Cola Acotada de Conexiones
//! src/queue/bounded.rs
//!
//! Cola FIFO de capacidad fija compartida entre el acceptor (productor) y los
//! workers (consumidores).
//!
//! ## Sincronización
//!
//! Un único `Mutex` protege los slots ocupados y el contador de slots libres
//! (la "compuerta de admisión"). Como ambos cambian bajo el mismo lock, en
//! todo momento se cumple `free_slots + len == capacity`.
//!
//! - `not_empty`: los workers esperan aquí mientras la cola está vacía
//! - `not_full`: el acceptor espera aquí bajo la política `Block`
//!
//! Toda espera vuelve a comprobar su predicado al despertar (wakeups espurios).
//! El lock nunca se mantiene durante una lectura o escritura de red.

use super::admission::{AdmissionPolicy, EnqueueError};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Estado protegido por el lock
struct QueueState<T> {
    /// Slots ocupados, en orden de llegada
    slots: VecDeque<T>,

    /// Compuerta de admisión: slots aún no reclamados por un productor
    free_slots: usize,

    /// Máximo de slots ocupados observado
    high_water_mark: usize,

    /// Elementos admitidos desde el arranque
    admitted: u64,

    /// Elementos rechazados por cola llena (solo política `Reject`)
    rejected: u64,
}

/// Cola FIFO acotada y thread-safe
pub struct BoundedQueue<T> {
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    policy: AdmissionPolicy,
}

impl<T> BoundedQueue<T> {
    /// Crea una cola con `capacity` slots y la política de admisión dada.
    ///
    /// Los slots se reservan aquí, así que encolar nunca asigna memoria.
    ///
    /// # Panics
    ///
    /// Si `capacity` es 0 (la configuración ya lo valida antes).
    pub fn new(capacity: usize, policy: AdmissionPolicy) -> Self {
        assert!(capacity > 0, "queue capacity must be >= 1");

        Self {
            state: Mutex::new(QueueState {
                slots: VecDeque::with_capacity(capacity),
                free_slots: capacity,
                high_water_mark: 0,
                admitted: 0,
                rejected: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            policy,
        }
    }

    /// Toma el lock aunque esté envenenado: el estado solo cambia con
    /// operaciones O(1) que no pueden quedar a medias.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola según la política configurada.
    ///
    /// - `Block`: espera a que haya un slot libre; nunca falla.
    /// - `Reject`: si no hay slot libre devuelve `Err(Full(item))` al instante.
    pub fn enqueue(&self, item: T) -> Result<(), EnqueueError<T>> {
        match self.policy {
            AdmissionPolicy::Block => {
                self.enqueue_blocking(item);
                Ok(())
            }
            AdmissionPolicy::Reject => self.try_enqueue(item),
        }
    }

    /// Encola esperando (sin límite) a que la compuerta tenga un slot libre
    pub fn enqueue_blocking(&self, item: T) {
        let mut state = self.lock();

        while state.free_slots == 0 {
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        self.admit(&mut state, item);
    }

    /// Encola solo si hay un slot libre ahora mismo
    pub fn try_enqueue(&self, item: T) -> Result<(), EnqueueError<T>> {
        let mut state = self.lock();

        if state.free_slots == 0 {
            state.rejected += 1;
            return Err(EnqueueError::Full(item));
        }

        self.admit(&mut state, item);
        Ok(())
    }

    /// Reclama un slot de la compuerta e inserta al final. Requiere el lock.
    fn admit(&self, state: &mut QueueState<T>, item: T) {
        state.free_slots -= 1;
        state.slots.push_back(item);
        state.admitted += 1;

        let len = state.slots.len();
        if len > state.high_water_mark {
            state.high_water_mark = len;
        }
        debug_assert_eq!(state.free_slots + len, self.capacity);

        // Notificar a un worker esperando
        self.not_empty.notify_one();
    }

    /// Desencola el elemento más antiguo.
    ///
    /// Bloquea hasta que haya uno disponible. Nunca retorna vacío: quien llama
    /// se compromete a procesar exactamente un elemento.
    pub fn dequeue(&self) -> T {
        let mut state = self.lock();

        loop {
            if let Some(item) = self.release(&mut state) {
                return item;
            }

            // Esperar a que haya elementos
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Intenta desencolar sin bloquear
    pub fn try_dequeue(&self) -> Option<T> {
        let mut state = self.lock();
        self.release(&mut state)
    }

    /// Saca la cabeza y devuelve su slot a la compuerta. Requiere el lock.
    fn release(&self, state: &mut QueueState<T>) -> Option<T> {
        let item = state.slots.pop_front()?;
        state.free_slots += 1;
        debug_assert_eq!(state.free_slots + state.slots.len(), self.capacity);

        // Despertar a un productor bloqueado por backpressure
        self.not_full.notify_one();
        Some(item)
    }

    /// Elementos actualmente en cola
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verifica si no quedan slots libres
    pub fn is_full(&self) -> bool {
        self.lock().free_slots == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    /// Obtiene estadísticas de la cola (una sola toma del lock)
    pub fn stats(&self) -> QueueStats {
        let state = self.lock();

        QueueStats {
            len: state.slots.len(),
            capacity: self.capacity,
            free_slots: state.free_slots,
            high_water_mark: state.high_water_mark,
            admitted: state.admitted,
            rejected: state.rejected,
            policy: self.policy,
        }
    }
}

/// Estadísticas de la cola
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub len: usize,
    pub capacity: usize,
    pub free_slots: usize,
    pub high_water_mark: usize,
    pub admitted: u64,
    pub rejected: u64,
    pub policy: AdmissionPolicy,
}
