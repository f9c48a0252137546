//! Fundamental exciton on an open chain of 15 sites, propagated in time.

use clap::Parser;
use xchain::{
    Driver,
    Mode,
    RunArtifacts,
    RunResult,
    Simulation,
    basis::BasisSpec,
    dynamics::{ InitialState, tdse::{ Normalize, Tdse, TdseMethod, TdseSpec } },
    graphics::{ PlotConfig, PlotType, Rendered, Visual },
    hamilton::Coupled,
    model::ChainModel,
    store::Persistence,
};

#[derive(Parser, Debug)]
#[command(about = "Time evolution of a coupled exciton-phonon chain")]
struct Cli {
    /// Solve without visualization.
    #[arg(long)]
    batch: bool,
}

struct CoupledTdse;

impl Simulation for CoupledTdse {
    type Hamiltonian = Coupled;
    type Dynamics = Tdse;
    type Visual = Rendered<Tdse>;

    fn hamiltonian(&self) -> RunResult<Coupled> {
        let mut hamilton = Coupled::new(ChainModel {
            n_site: 15,                         // number of sites
            periodic: false,                    // periodic boundary conditions
            homogen: true,                      // homogeneous chain/ring
            alpha: 1e-1.into(),                 // excitonic site energy
            beta: (-1e-2).into(),               // coupling strength (NN)
            eta: 0.0,                           // constant energy offset
            mass: 1.0,                          // particle mass
            nu: 1e-3.into(),                    // position restraints
            omg: (1e-3 * 2.0_f64.sqrt()).into(), // nearest neighbors
            chi: 0e-4.into(),                   // exciton-phonon tuning: localized
            rho: 0e-4.into(),                   // exciton-phonon tuning: non-symmetric
            sig: 10e-4.into(),                  // exciton-phonon tuning: symmetrized
            tau: 0e-4.into(),                   // exciton-phonon coupling: pair distance
        })?;
        hamilton.get_tt(BasisSpec::new(
            vec![2, 4],                         // excitonic and phononic basis sizes
            false,                              // quantized encoding
        )?)?;
        Ok(hamilton)
    }

    fn dynamics(&self, hamilton: Coupled, artifacts: &RunArtifacts)
        -> RunResult<Tdse>
    {
        let step_size = 0.01 / hamilton.sig()[0];
        let spec = TdseSpec {
            num_steps: 25,                      // number of main time steps
            step_size,                          // size of main time steps
            sub_steps: 10,                      // number of sub steps
            solver: TdseMethod::Sm,             // Strang-Marchuk splitting
            normalize: Normalize::Off,          // no renormalization
            max_rank: 12,                       // max rank of solution
            repeats: 15,                        // sweeps (implicit solvers only)
            threshold: 1e-12,                   // threshold in ALS decomposition
        };
        Tdse::new(hamilton, spec, Persistence::from_artifacts(artifacts))
    }

    fn initial_state(&self) -> Option<InitialState> {
        Some(InitialState::Fundamental)         // near center of chain
    }

    fn visual(&self, dynamics: Tdse, artifacts: &RunArtifacts)
        -> RunResult<Rendered<Tdse>>
    {
        let config = PlotConfig {
            plot_type: PlotType::Populations,
            plot_expect: true,
            figure_size: (1050, 450),
            snapshots: false,
            frame_rate: 1,
            outputs: None,
        };
        Visual::new(dynamics, config.for_run(artifacts)).create()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mode = if cli.batch { Mode::Batch } else { Mode::Interactive };
    let driver = Driver::from_script(file!(), mode)?;
    driver.run(&CoupledTdse)?;
    Ok(())
}
