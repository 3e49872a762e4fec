//! Step report for the CLI frontend.
//!
//! Writes one tab-separated line per outer step: electric time, inlet
//! potential of the first carrier and the Joule integral of every carrier.

use std::io::{self, Write};

use crate::conductor::CableModel;
use crate::error::{Result, ScableError};
use crate::solver::ElectricSimulator;

/// Tab-separated report writer.
pub struct StepReport<W: Write> {
    out: W,
}

impl StepReport<io::Stdout> {
    /// Report to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StepReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Column names.
    pub fn write_header(&mut self, carriers: &[String]) -> Result<()> {
        let mut line = String::from("time_s\tinlet_potential_V");
        for name in carriers {
            line.push_str(&format!("\tjoule_{name}_J"));
        }
        self.write_line(&line)
    }

    pub fn write_step(&mut self, time: f64, inlet_potential: f64, joule: &[f64]) -> Result<()> {
        let mut line = format!("{time:.6e}\t{inlet_potential:.6e}");
        for integral in joule {
            line.push_str(&format!("\t{integral:.6e}"));
        }
        self.write_line(&line)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(output_error)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").map_err(output_error)
    }
}

fn output_error(e: io::Error) -> ScableError {
    ScableError::ReportOutputError {
        message: e.to_string(),
    }
}

/// Solve the steady state, then run `steps` outer steps of `outer_dt`,
/// reporting after the steady state and after every step.
pub fn run_cable<W: Write>(
    simulator: &mut ElectricSimulator<CableModel>,
    outer_dt: f64,
    steps: usize,
    report: &mut StepReport<W>,
) -> Result<()> {
    let names: Vec<String> = simulator
        .conductor()
        .descriptor()
        .carriers
        .iter()
        .map(|c| c.name.clone())
        .collect();
    report.write_header(&names)?;

    simulator.steady_state()?;
    let inlet = simulator.conductor().potential_dof(0, 0);
    report.write_step(
        simulator.time(),
        simulator.solution().re(inlet),
        simulator.joule().integrals(),
    )?;

    for _ in 0..steps {
        simulator.advance(outer_dt)?;
        report.write_step(
            simulator.time(),
            simulator.solution().re(inlet),
            simulator.joule().integrals(),
        )?;
    }

    report.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CurrentCarrier, CurrentWaveform};
    use crate::conductor::CableDescriptor;

    #[test]
    fn test_report_lines() {
        let cable = CableDescriptor::new(1.0, 2)
            .with_carrier(CurrentCarrier::strand("cu", 1.0, 1.0, 0.0).unwrap())
            .with_current(CurrentWaveform::Constant(1.0))
            .with_fixed_potential_at(1.0, 0.0);
        let mut sim = ElectricSimulator::new(CableModel::new(cable).unwrap()).unwrap();
        let mut report = StepReport::new(Vec::new());
        run_cable(&mut sim, 0.1, 3, &mut report).unwrap();

        let text = String::from_utf8(report.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "time_s\tinlet_potential_V\tjoule_cu_J");
        assert_eq!(lines[1], "0.000000e0\t1.000000e0\t0.000000e0");
        let last: Vec<&str> = lines[4].split('\t').collect();
        assert_eq!(last.len(), 3);
        assert_eq!(last[1], "1.000000e0");
        // 1 W over 0.3 s
        let joule: f64 = last[2].parse().unwrap();
        assert!((joule - 0.3).abs() < 1e-9);
    }
}
