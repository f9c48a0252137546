//! Lowest energy levels of a periodic ring of 5 sites.

use clap::Parser;
use xchain::{
    Driver,
    Mode,
    RunArtifacts,
    RunResult,
    Simulation,
    basis::BasisSpec,
    dynamics::tise::{ MicroEigen, Tise, TiseMethod, TiseSpec },
    graphics::{ PlotConfig, PlotType, Rendered, Visual },
    hamilton::Coupled,
    model::ChainModel,
    store::Persistence,
};

#[derive(Parser, Debug)]
#[command(about = "Energy levels of a coupled exciton-phonon ring")]
struct Cli {
    /// Solve without visualization.
    #[arg(long)]
    batch: bool,
}

struct CoupledTise;

impl Simulation for CoupledTise {
    type Hamiltonian = Coupled;
    type Dynamics = Tise;
    type Visual = Rendered<Tise>;

    fn hamiltonian(&self) -> RunResult<Coupled> {
        let mut hamilton = Coupled::new(ChainModel {
            n_site: 5,                          // number of sites
            periodic: true,                     // periodic boundary conditions
            homogen: true,                      // homogeneous chain/ring
            alpha: 1e-1.into(),                 // excitonic site energy
            beta: (-1e-2).into(),               // coupling strength (NN)
            eta: 0.0,                           // constant energy offset
            mass: 1.0,                          // particle mass
            nu: 1e-3.into(),                    // position restraints
            omg: (1e-3 * 2.0_f64.sqrt()).into(), // nearest neighbors
            chi: 0e-4.into(),                   // exciton-phonon tuning: localized
            rho: 0e-4.into(),                   // exciton-phonon tuning: non-symmetric
            sig: 2e-4.into(),                   // exciton-phonon tuning: symmetrized
            tau: 0e-4.into(),                   // exciton-phonon coupling: pair distance
        })?;
        hamilton.get_tt(BasisSpec::new(vec![2, 4], false)?)?;
        Ok(hamilton)
    }

    fn dynamics(&self, hamilton: Coupled, artifacts: &RunArtifacts)
        -> RunResult<Tise>
    {
        let spec = TiseSpec {
            n_levels: 4,                        // number of energy levels
            solver: TiseMethod::Als,            // eigensolver for the full system
            eigen: MicroEigen::Eigs,            // eigensolver for the micro systems
            ranks: 20,                          // rank of initial guess
            repeats: 20,                        // number of sweeps
            conv_eps: 1e-8,                     // eigenvalue convergence threshold
            e_est: 0.070,                       // levels closest to this energy
            e_min: 0.070,                       // lower end of energy plot axis
            e_max: 0.100,                       // upper end of energy plot axis
        };
        Tise::new(hamilton, spec, Persistence::from_artifacts(artifacts))
    }

    fn visual(&self, dynamics: Tise, artifacts: &RunArtifacts)
        -> RunResult<Rendered<Tise>>
    {
        let config = PlotConfig {
            plot_type: PlotType::Levels,
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
    driver.run(&CoupledTise)?;
    Ok(())
}
