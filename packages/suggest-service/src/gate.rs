use tokio::sync::watch;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
	Pending,
	Open,
	/// A newer generation replaced this gate before it opened.
	Superseded,
	/// The service stopped before this gate opened.
	Closed,
}

/// One-shot latch scoped to a single lifecycle generation.
///
/// Leaves `Pending` at most once. Every waiter is released by that transition, whichever state
/// it lands in.
#[derive(Debug)]
pub struct ReadinessGate {
	generation: u64,
	state: watch::Sender<GateState>,
}
impl ReadinessGate {
	pub fn new(generation: u64) -> Self {
		let (state, _) = watch::channel(GateState::Pending);

		Self { generation, state }
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn state(&self) -> GateState {
		*self.state.borrow()
	}

	/// Returns `true` only for the call that actually opened the gate.
	pub fn open(&self) -> bool {
		self.transition(GateState::Open)
	}

	pub(crate) fn supersede(&self) -> bool {
		self.transition(GateState::Superseded)
	}

	pub(crate) fn close(&self) -> bool {
		self.transition(GateState::Closed)
	}

	/// Suspends until the gate leaves `Pending` and returns the state it settled in.
	pub async fn wait(&self) -> GateState {
		let mut receiver = self.state.subscribe();

		match receiver.wait_for(|state| *state != GateState::Pending).await {
			Ok(state) => *state,
			Err(_) => GateState::Closed,
		}
	}

	fn transition(&self, next: GateState) -> bool {
		self.state.send_if_modified(|state| {
			if *state != GateState::Pending {
				return false;
			}

			*state = next;

			true
		})
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, time::Duration};

	use super::{GateState, ReadinessGate};

	#[tokio::test]
	async fn open_releases_every_waiter() {
		let gate = Arc::new(ReadinessGate::new(1));
		let waiters: Vec<_> = (0..4)
			.map(|_| {
				let gate = gate.clone();

				tokio::spawn(async move { gate.wait().await })
			})
			.collect();

		tokio::time::sleep(Duration::from_millis(10)).await;

		assert!(gate.open());

		for waiter in waiters {
			assert_eq!(waiter.await.expect("Waiter panicked."), GateState::Open);
		}
	}

	#[tokio::test]
	async fn opens_exactly_once_and_never_reverts() {
		let gate = ReadinessGate::new(3);

		assert!(gate.open());
		assert!(!gate.open());
		assert!(!gate.supersede());
		assert!(!gate.close());
		assert_eq!(gate.state(), GateState::Open);
		assert_eq!(gate.wait().await, GateState::Open);
		assert_eq!(gate.generation(), 3);
	}

	#[tokio::test]
	async fn superseded_gate_releases_waiters_without_opening() {
		let gate = Arc::new(ReadinessGate::new(1));
		let waiter = {
			let gate = gate.clone();

			tokio::spawn(async move { gate.wait().await })
		};

		tokio::task::yield_now().await;

		assert!(gate.supersede());
		assert_eq!(waiter.await.expect("Waiter panicked."), GateState::Superseded);
		assert!(!gate.open());
	}
}
