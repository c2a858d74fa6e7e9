use crate::source::Source;

/// Coefficient distributions used to draw ring elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Distributions {
    /// Uniform in `[-bound, bound]`.
    Uniform(u64),
}

impl Distributions {
    pub fn sample(&self, source: &mut Source) -> i64 {
        match self {
            Distributions::Uniform(bound) => source.next_i64_centered(*bound),
        }
    }

    /// Fills `coeffs` with independent samples.
    pub fn fill(&self, source: &mut Source, coeffs: &mut [i64]) {
        coeffs.iter_mut().for_each(|c| *c = self.sample(source));
    }
}
