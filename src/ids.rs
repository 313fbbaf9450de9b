/// Monotonic id source owned by a [`Simulation`](crate::Simulation).
///
/// Node identities and beat generation ids are drawn from the same stream, so
/// a beat's generation is always newer than anything handed out before it.
/// Zero is never issued; it is the "never struck" collision level.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// The most recently issued id (0 if none yet).
    pub fn last(&self) -> u64 {
        self.last
    }
}
