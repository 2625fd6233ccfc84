//! Timed comparison of the three multipliers.

use std::fmt;
use std::time::{Duration, Instant};

use linked_matrix::{Dense, DenseMatrix, Lattice, Strassen};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::Error;

const RULE: &str = "============================================================";

/// Settings for one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// First matrix width; must be a power of two of at least 2.
    pub start_size: usize,
    /// Largest matrix width, inclusive.
    pub max_size: usize,
    pub tests_per_size: usize,
    /// Cells are drawn uniformly from `1..=range`.
    pub range: i32,
    /// Hybrid cutoff width of the first test at each size, doubled per test.
    pub first_cutoff: usize,
    pub seed: Option<u64>,
    /// Compare all three products and fail on any difference.
    pub verify: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            start_size: 4,
            max_size: 2048,
            tests_per_size: 5,
            range: 1000,
            first_cutoff: 8,
            seed: None,
            verify: false,
        }
    }
}

impl BenchConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.start_size < 2 || !self.start_size.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "start size {} is not a power of two >= 2",
                self.start_size
            )));
        }
        if self.max_size < self.start_size {
            return Err(Error::InvalidConfig(format!(
                "max size {} is below start size {}",
                self.max_size, self.start_size
            )));
        }
        if self.range < 1 {
            return Err(Error::InvalidConfig(format!(
                "value range {} must be positive",
                self.range
            )));
        }
        Ok(())
    }

    /// Matrix widths visited by a run.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(self.start_size), |n| n.checked_mul(2))
            .take_while(|&n| n <= self.max_size)
    }
}

/// Timings for one pair of matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub test: usize,
    pub size: usize,
    pub cutoff: usize,
    pub standard: Duration,
    pub hybrid: Duration,
    pub strassen: Duration,
    /// Whether the products were compared and found equal. A disagreement
    /// fails the case instead of producing a report.
    pub verified: bool,
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{RULE}")?;
        writeln!(f, "Test #{}", self.test)?;
        writeln!(f, "{RULE}\n")?;
        writeln!(f, "Matrix Size: {}", self.size)?;
        writeln!(f, "Standard Time: {:.3} (milliseconds)", millis(self.standard))?;
        writeln!(
            f,
            "Hybrid Time:   {:.3} (milliseconds) cutoff: {}",
            millis(self.hybrid),
            self.cutoff
        )?;
        write!(f, "Strassen Time: {:.3} (milliseconds)", millis(self.strassen))?;
        if self.verified {
            write!(f, "\nVerified:      ok")?;
        }
        Ok(())
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Fills a `size`x`size` matrix with values from `1..=range`.
pub fn random_matrix<R: Rng>(rng: &mut R, size: usize, range: i32) -> Vec<Vec<i32>> {
    (0..size)
        .map(|_| (0..size).map(|_| rng.gen_range(1..=range)).collect())
        .collect()
}

/// Benchmark driver.
pub struct Bench {
    config: BenchConfig,
    rng: StdRng,
}

impl Bench {
    pub fn new(config: BenchConfig) -> Result<Self, Error> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Runs every configured test, handing each report to `on_report` as soon
    /// as it is ready.
    pub fn run(
        &mut self,
        mut on_report: impl FnMut(&CaseReport),
    ) -> Result<Vec<CaseReport>, Error> {
        let sizes: Vec<usize> = self.config.sizes().collect();
        info!(?sizes, tests = self.config.tests_per_size, "starting benchmark");

        let mut reports = Vec::new();
        for size in sizes {
            let mut cutoff = self.config.first_cutoff;
            for _ in 0..self.config.tests_per_size {
                let report = self.run_case(reports.len() + 1, size, cutoff)?;
                on_report(&report);
                reports.push(report);
                cutoff = cutoff.saturating_mul(2);
            }
        }
        Ok(reports)
    }

    /// Times the three multipliers on one fresh random pair.
    pub fn run_case(
        &mut self,
        test: usize,
        size: usize,
        cutoff: usize,
    ) -> Result<CaseReport, Error> {
        let range = self.config.range;
        let a = random_matrix(&mut self.rng, size, range);
        let b = random_matrix(&mut self.rng, size, range);
        let dense_a = DenseMatrix::from_rows(&a)?;
        let dense_b = DenseMatrix::from_rows(&b)?;

        let started = Instant::now();
        let standard = dense_a.standard(&dense_b)?;
        let standard_time = started.elapsed();
        debug!(size, elapsed = ?standard_time, "standard");

        let started = Instant::now();
        let hybrid = Strassen::with_cutoff(cutoff).multiply(&mut Dense, dense_a, dense_b)?;
        let hybrid_time = started.elapsed();
        debug!(size, cutoff, elapsed = ?hybrid_time, "hybrid");

        let mut lattice = Lattice::with_capacity(4 * size * size);
        let x = lattice.build(&a)?;
        let y = lattice.build(&b)?;
        let started = Instant::now();
        let linked = lattice.multiply(x, y)?;
        let strassen_time = started.elapsed();
        debug!(size, elapsed = ?strassen_time, "linked strassen");

        if self.config.verify {
            let expected = standard.to_rows();
            if hybrid != standard || lattice.to_rows(&linked)? != expected {
                warn!(test, size, cutoff, "products disagree");
                return Err(Error::Disagreement { size, test });
            }
        }

        Ok(CaseReport {
            test,
            size,
            cutoff,
            standard: standard_time,
            hybrid: hybrid_time,
            strassen: strassen_time,
            verified: self.config.verify,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_double_up_to_max() {
        let config = BenchConfig {
            start_size: 4,
            max_size: 40,
            ..BenchConfig::default()
        };
        assert_eq!(config.sizes().collect::<Vec<_>>(), vec![4, 8, 16, 32]);
    }

    #[test]
    fn test_default_sizes_match_classic_run() {
        let sizes: Vec<usize> = BenchConfig::default().sizes().collect();
        assert_eq!(sizes.first(), Some(&4));
        assert_eq!(sizes.last(), Some(&2048));
        assert_eq!(sizes.len(), 10);
    }

    #[test]
    fn test_invalid_configs() {
        for config in [
            BenchConfig {
                start_size: 6,
                ..BenchConfig::default()
            },
            BenchConfig {
                start_size: 1,
                ..BenchConfig::default()
            },
            BenchConfig {
                start_size: 16,
                max_size: 8,
                ..BenchConfig::default()
            },
            BenchConfig {
                range: 0,
                ..BenchConfig::default()
            },
        ] {
            assert!(matches!(Bench::new(config), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_random_matrix_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let m = random_matrix(&mut rng, 8, 3);

        assert_eq!(m.len(), 8);
        assert!(m.iter().all(|row| row.len() == 8));
        assert!(m.iter().flatten().all(|v| (1..=3).contains(v)));
    }

    #[test]
    fn test_run_case_verifies() {
        let mut bench = Bench::new(BenchConfig {
            seed: Some(42),
            verify: true,
            ..BenchConfig::default()
        })
        .unwrap();

        let report = bench.run_case(1, 16, 4).unwrap();

        assert_eq!(report.size, 16);
        assert_eq!(report.cutoff, 4);
        assert!(report.verified);
    }

    #[test]
    fn test_report_display() {
        let report = CaseReport {
            test: 3,
            size: 8,
            cutoff: 16,
            standard: Duration::from_millis(2),
            hybrid: Duration::from_micros(1500),
            strassen: Duration::ZERO,
            verified: true,
        };

        let text = report.to_string();
        assert!(text.contains("Test #3"));
        assert!(text.contains("Matrix Size: 8"));
        assert!(text.contains("Standard Time: 2.000 (milliseconds)"));
        assert!(text.contains("Hybrid Time:   1.500 (milliseconds) cutoff: 16"));
        assert!(text.ends_with("Verified:      ok"));

        let unchecked = CaseReport {
            verified: false,
            ..report
        };
        assert!(unchecked.to_string().ends_with("Strassen Time: 0.000 (milliseconds)"));
    }
}
