//! Regression test bookkeeping

use comptree_core::Image;

/// How a regression run treats mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Mismatches fail the test (default)
    #[default]
    Compare,
    /// Mismatches are reported but the test still passes
    Display,
}

impl RegTestMode {
    /// Read the mode from the `REGTEST_MODE` environment variable.
    pub fn from_env() -> Self {
        if std::env::var("REGTEST_MODE").is_ok_and(|v| v.eq_ignore_ascii_case("display")) {
            RegTestMode::Display
        } else {
            RegTestMode::Compare
        }
    }
}

/// Accumulator for one regression suite.
///
/// Each comparison gets a sequence number; mismatches are printed as they
/// happen and tallied for the final verdict. Suites end with
/// `assert!(rp.cleanup())`.
pub struct RegParams {
    name: String,
    /// Mismatch handling for this run
    pub mode: RegTestMode,
    checks: usize,
    failed: Vec<usize>,
}

impl RegParams {
    /// Open a suite and print its header line.
    pub fn new(name: &str) -> Self {
        let mode = RegTestMode::from_env();
        eprintln!("-- {name}_reg ({mode:?}) --");
        RegParams {
            name: name.to_string(),
            mode,
            checks: 0,
            failed: Vec::new(),
        }
    }

    /// Number of comparisons run so far.
    pub fn index(&self) -> usize {
        self.checks
    }

    fn fail(&mut self, detail: String) {
        eprintln!("{}_reg #{}: {detail}", self.name, self.checks);
        self.failed.push(self.checks);
    }

    /// Compare two floats within an absolute tolerance.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.checks += 1;
        if (expected - actual).abs() <= delta {
            return true;
        }
        self.fail(format!("got {actual}, wanted {expected} (tolerance {delta})"));
        false
    }

    /// Compare two integers exactly.
    pub fn compare_ints(&mut self, expected: i64, actual: i64) -> bool {
        self.checks += 1;
        if expected == actual {
            return true;
        }
        self.fail(format!("got {actual}, wanted {expected}"));
        false
    }

    /// Compare two images pixel for pixel.
    pub fn compare_images<T: PartialEq + std::fmt::Debug>(
        &mut self,
        expected: &Image<T>,
        actual: &Image<T>,
    ) -> bool {
        self.checks += 1;
        if expected.size() != actual.size() {
            self.fail(format!(
                "image shape {:?} differs from expected {:?}",
                actual.size(),
                expected.size()
            ));
            return false;
        }
        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data().iter())
            .position(|(a, b)| a != b);
        match mismatch {
            Some(off) => {
                let (x, y, z) = expected.coord_of(off);
                self.fail(format!(
                    "images differ at ({x}, {y}, {z}): got {:?}, wanted {:?}",
                    actual.data()[off],
                    expected.data()[off]
                ));
                false
            }
            None => true,
        }
    }

    /// Record a named boolean condition.
    pub fn check(&mut self, what: &str, ok: bool) -> bool {
        self.checks += 1;
        if !ok {
            self.fail(format!("condition failed: {what}"));
        }
        ok
    }

    /// Print the verdict. True when nothing failed, or when the run is in
    /// display mode.
    pub fn cleanup(&self) -> bool {
        if self.failed.is_empty() {
            eprintln!("-- {}_reg ok, {} checks --", self.name, self.checks);
        } else {
            eprintln!(
                "-- {}_reg FAILED {} of {} checks (#{}) --",
                self.name,
                self.failed.len(),
                self.checks,
                self.failed
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", #")
            );
        }
        self.failed.is_empty() || self.mode == RegTestMode::Display
    }
}
