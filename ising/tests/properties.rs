use ising::rng::seeded;
use ising::{Lattice, Metropolis};
use proptest::prelude::*;

fn assert_valid(lattice: &Lattice) {
    assert!(lattice.snapshot().iter().all(|&s| s == 1 || s == -1));
    assert!(lattice.magnetization().unsigned_abs() as usize <= lattice.site_count());
}

proptest! {
    #[test]
    fn spins_stay_binary_and_magnetization_bounded(
        seed in any::<u64>(),
        rows in 1usize..7,
        cols in 1usize..7,
        beta in 0.0f64..2.0,
        steps in 0usize..400,
    ) {
        let mut rng = seeded(seed);
        let mut lattice = Lattice::new(rows, cols, 1.0, &mut rng).unwrap();
        assert_valid(&lattice);
        let updater = Metropolis::new(beta);
        for _ in 0..steps {
            updater.step(&mut lattice, &mut rng);
        }
        assert_valid(&lattice);
        prop_assert_eq!(lattice.rows(), rows);
        prop_assert_eq!(lattice.cols(), cols);
    }

    #[test]
    fn local_delta_matches_global_energy(
        seed in any::<u64>(),
        rows in 1usize..6,
        cols in 1usize..6,
        coupling in -2.0f64..2.0,
    ) {
        let mut rng = seeded(seed);
        let lattice = Lattice::new(rows, cols, coupling, &mut rng).unwrap();
        let before = lattice.total_energy();
        for row in 0..rows {
            for col in 0..cols {
                let mut flipped = lattice.clone();
                flipped.flip(row, col);
                let actual = flipped.total_energy() - before;
                prop_assert!((actual - lattice.flip_energy_delta(row, col)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn same_seed_same_trajectory(seed in any::<u64>(), beta in 0.0f64..1.5) {
        let run = || {
            let mut rng = seeded(seed);
            let mut lattice = Lattice::new(5, 4, 1.0, &mut rng).unwrap();
            let updater = Metropolis::new(beta);
            (0..200)
                .map(|_| {
                    updater.step(&mut lattice, &mut rng);
                    lattice.magnetization()
                })
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(run(), run());
    }
}
