//! Scable - Cable Electric Solver
//!
//! Solves the electric problem of a multi-carrier cable and reports the
//! inlet potential and Joule energy per outer time step.
//!
//! # Usage
//!
//! ```bash
//! scable --length 10 --elements 50 --carriers 2 --contact 1e3 --steps 20 --outer-dt 1e-3
//! ```

use clap::{Parser, ValueEnum};
use scable_core::{
    components::{ConductanceDefinition, CurrentCarrier, CurrentWaveform, InterCarrierConductance},
    error::Result,
    report::{run_cable, StepReport},
    CableDescriptor, CableModel, ElectricConfig, ElectricSimulator, DEFAULT_OUTER_TIME_STEP,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Waveform {
    Constant,
    Cosine,
}

/// Multi-carrier cable electric solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cable length in m
    #[arg(long, default_value_t = 1.0)]
    length: f64,

    /// Elements per carrier
    #[arg(long, default_value_t = 20)]
    elements: usize,

    /// Number of identical strands
    #[arg(long, default_value_t = 1)]
    carriers: usize,

    /// Strand cross section in m^2
    #[arg(long, default_value_t = 1e-6)]
    area: f64,

    /// Strand resistivity in Ohm m
    #[arg(long, default_value_t = 1.7e-8)]
    resistivity: f64,

    /// Strand self inductance in H/m
    #[arg(long, default_value_t = 1e-7)]
    inductance: f64,

    /// Contact conductance between neighbouring strands in S/m (0 = none)
    #[arg(long, default_value_t = 0.0)]
    contact: f64,

    /// Operating current shape
    #[arg(long, value_enum, default_value_t = Waveform::Cosine)]
    waveform: Waveform,

    /// Current amplitude in A
    #[arg(long, default_value_t = 1.0)]
    current: f64,

    /// Cosine frequency in Hz
    #[arg(long, default_value_t = 50.0)]
    frequency: f64,

    /// Number of outer steps after the steady state
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Outer time step in s
    #[arg(long, default_value_t = DEFAULT_OUTER_TIME_STEP)]
    outer_dt: f64,

    /// Electric sub-steps per outer step
    #[arg(long, default_value_t = scable_core::solver::DEFAULT_ELECTRIC_STEPS)]
    sub_steps: usize,

    /// Theta-method parameter (1 = backward Euler, 0.5 = Crank-Nicolson)
    #[arg(long, default_value_t = scable_core::solver::DEFAULT_THETA)]
    theta: f64,
}

fn build_cable(args: &Args) -> Result<CableDescriptor> {
    let current = match args.waveform {
        Waveform::Constant => CurrentWaveform::Constant(args.current),
        Waveform::Cosine => CurrentWaveform::Cosine {
            amplitude: args.current,
            frequency: args.frequency,
        },
    };

    let mut cable = CableDescriptor::new(args.length, args.elements)
        .with_current(current)
        .with_fixed_potential_at(args.length, 0.0);
    for i in 0..args.carriers {
        cable = cable.with_carrier(CurrentCarrier::strand(
            format!("strand{i}"),
            args.area,
            args.resistivity,
            args.inductance,
        )?);
    }
    if args.contact > 0.0 {
        for i in 1..args.carriers {
            cable = cable.with_contact(InterCarrierConductance::new(
                [i - 1, i],
                args.contact,
                ConductanceDefinition::PerUnitLength,
            )?);
        }
    }
    if args.carriers > 1 {
        cable = cable.with_equipotential_at(0.0);
    }
    Ok(cable)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Describe the cable
    let cable = build_cable(&args)?;

    // Build the conductor
    let model = CableModel::new(cable)?;

    // Create simulator
    let config = ElectricConfig::new()
        .with_steps_per_call(args.sub_steps)
        .with_theta(args.theta);
    let mut simulator = ElectricSimulator::with_config(model, config)?;

    // Steady state, then outer steps
    let mut report = StepReport::stdout();
    run_cable(&mut simulator, args.outer_dt, args.steps, &mut report)?;

    Ok(())
}
