/// Objects with a position in the (pseudorapidity, azimuth) plane
pub trait EtaPhi {
    fn eta(&self) -> f64;
    fn phi(&self) -> f64;
}

impl EtaPhi for (f64, f64) {
    fn eta(&self) -> f64 {
        self.0
    }

    fn phi(&self) -> f64 {
        self.1
    }
}

impl<T: EtaPhi> EtaPhi for &T {
    fn eta(&self) -> f64 {
        T::eta(*self)
    }

    fn phi(&self) -> f64 {
        T::phi(*self)
    }
}

/// Progress indicator for event loops
pub trait Progress {
    fn inc(&self, i: u64);
    fn finish(&self);
}
