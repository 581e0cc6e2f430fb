//! Console report for one benchmark run.

use std::fmt;

use crate::timing::{performance_ratio, TimingRecord};

/// What one engine produced
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub label: String,
    pub result: u64,
    pub timing: TimingRecord,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub n: usize,
    pub reference: EngineOutcome,
    pub candidate: EngineOutcome,
}

impl Report {
    pub fn results_match(&self) -> bool {
        self.reference.result == self.candidate.result
    }

    pub fn ratio(&self) -> Option<f64> {
        performance_ratio(&self.reference.timing, &self.candidate.timing)
    }

    fn label_width(&self) -> usize {
        self.reference.label.len().max(self.candidate.label.len())
    }

    fn result_line(&self, outcome: &EngineOutcome) -> String {
        format!(
            "{:>width$}: Result = {} calculated in {:.3}ms",
            outcome.label,
            outcome.result,
            outcome.timing.elapsed_ms(),
            width = self.label_width()
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dot product of 2, {} dimensional i32 vectors", self.n)?;
        writeln!(f, "{}", self.result_line(&self.reference))?;
        writeln!(f, "{}", self.result_line(&self.candidate))?;

        if !self.results_match() {
            writeln!(
                f,
                "WARNING: results differ ({} = {}, {} = {})",
                self.reference.label,
                self.reference.result,
                self.candidate.label,
                self.candidate.result
            )?;
        }

        writeln!(f)?;
        match self.ratio() {
            Some(ratio) => writeln!(
                f,
                "{} : {} performance ratio = {:.3}:1",
                self.reference.label, self.candidate.label, ratio
            ),
            None => writeln!(
                f,
                "{} : {} performance ratio undefined ({} took no measurable time)",
                self.reference.label, self.candidate.label, self.candidate.label
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn outcome(label: &str, result: u64, start: Instant, micros: u64) -> EngineOutcome {
        EngineOutcome {
            label: label.to_string(),
            result,
            timing: TimingRecord {
                start,
                end: start + Duration::from_micros(micros),
            },
        }
    }

    #[test]
    fn test_report_format() {
        let start = Instant::now();
        let report = Report {
            n: 4,
            reference: outcome("Native", 70, start, 2500),
            candidate: outcome("WebAssembly", 70, start, 1250),
        };

        assert_eq!(
            report.to_string(),
            "Dot product of 2, 4 dimensional i32 vectors\n\
             \x20    Native: Result = 70 calculated in 2.500ms\n\
             WebAssembly: Result = 70 calculated in 1.250ms\n\
             \n\
             Native : WebAssembly performance ratio = 2.000:1\n"
        );
    }

    #[test]
    fn test_mismatch_warning() {
        let start = Instant::now();
        let report = Report {
            n: 4,
            reference: outcome("Native", 70, start, 10),
            candidate: outcome("WebAssembly", 71, start, 10),
        };

        assert!(!report.results_match());
        assert!(report
            .to_string()
            .contains("WARNING: results differ (Native = 70, WebAssembly = 71)"));
    }

    #[test]
    fn test_zero_candidate_time() {
        let start = Instant::now();
        let report = Report {
            n: 4,
            reference: outcome("Native", 70, start, 10),
            candidate: outcome("WebAssembly", 70, start, 0),
        };

        assert_eq!(report.ratio(), None);
        assert!(report.to_string().contains("ratio undefined"));
    }
}
