//! Action potential travelling through a Y-shaped nerve fibre.
//!
//! A current pulse at the free end of branch A triggers a spike that runs to
//! the junction and splits into branches B and C.
//!
//! # Usage
//!
//! ```text
//! cargo run -p chebstep-observers --example hodgkin_huxley
//! cargo run -p chebstep-observers --example hodgkin_huxley -- <dx cm> <dt ms> <adaptive 0|1> <end ms>
//! cargo run -p chebstep-observers --example hodgkin_huxley -- 0.02 0.001 1 5
//! ```
//!
//! Output is tab-separated text on stdout: the potential at the probe node
//! over time, then the final potential and gates along each branch.

use std::{error::Error, str::FromStr};

use chebstep_cable::{
    Branch, Membrane, Mesh, Stimulus,
    simulation::{self, POTENTIAL},
};
use chebstep_observers::Probe;
use uom::si::{
    electric_potential::millivolt,
    f64::{Length, Time},
    length::centimeter,
    time::millisecond,
};

fn arg<T: FromStr>(position: usize, name: &str, default: T) -> T {
    match std::env::args().nth(position) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid {name}: {raw}");
            eprintln!("Usage: hodgkin_huxley [dx cm] [dt ms] [adaptive 0|1] [end ms]");
            std::process::exit(1);
        }),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let dx: f64 = arg(1, "mesh spacing", 0.01);
    let dt: f64 = arg(2, "step size", 5e-4);
    let adaptive = arg::<u8>(3, "adaptivity flag", 0) == 1;
    let end_time: f64 = arg(4, "end time", 10.0);

    let mesh = Mesh::y_junction(Length::new::<centimeter>(dx))?;
    let membrane = Membrane::default();
    let stimulus = Stimulus::default();

    let defaults = simulation::Config::default();
    let config = simulation::Config::new(
        Time::new::<millisecond>(end_time),
        Time::new::<millisecond>(dt),
    )
    .with_solver(defaults.solver.with_adaptive(adaptive));

    let node = mesh.probe_node();
    let mut probe = Probe::new(POTENTIAL, node);
    let solution = simulation::solve(&mesh, &membrane, &stimulus, &config, &mut probe)?;

    println!(
        "# probe node {node} at {:.4} cm, rest {:.3} mV",
        mesh.grid()[node],
        membrane.rest_potential().get::<millivolt>()
    );
    println!("# time_ms\tpotential_mV");
    for (t, v) in probe.samples() {
        println!("{t:.12}\t{v:.12}");
    }

    let fields = &solution.fields;
    for branch in Branch::ALL {
        println!();
        println!("# branch {branch}");
        println!("# x_cm\tpotential_mV\tn\tm\th");
        for i in mesh.branch(branch) {
            println!(
                "{:.12}\t{:.12}\t{:.12}\t{:.12}\t{:.12}",
                mesh.grid()[i],
                fields.potential.values()[i],
                fields.n.values()[i],
                fields.m.values()[i],
                fields.h.values()[i],
            );
        }
    }

    eprintln!("{mesh}");
    eprintln!("{:?} after {} iterations", solution.status, solution.iterations);
    for (name, stats) in &solution.statistics {
        eprintln!("[{name}] {stats}");
    }

    Ok(())
}
