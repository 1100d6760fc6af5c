#[cfg(test)]
mod determinism_tests {
    use crate::{
        dithering::{Dither, Parallelism},
        machines::{Machine, MachineSettings, MachineTransform},
        tests::utils::*,
        texture::Texture,
        transform::prelude::*,
    };

    fn process(machine: Machine, settings: &MachineSettings, texture: &Texture<u8>) -> Texture<u8> {
        let mut output = texture.clone();
        MachineTransform::new(machine, settings)
            .unwrap()
            .once(output.as_texture_mut_slice(), &Progress::none());
        output
    }

    /// Every selector the flat palette model takes.
    fn dithers() -> impl Iterator<Item = Dither> {
        (0..=14).map(|idx| Dither::from_index(idx).unwrap())
    }

    #[test]
    fn test_runs_are_repeatable() {
        let input = gen_gradient_texture(96, 64, 4, 21);
        for machine in Machine::ALL {
            let settings = MachineSettings::default();
            let first = process(machine, &settings, &input);
            let second = process(machine, &settings, &input);
            assert_eq!(first, second, "{machine}");
            assert_ne!(first, input, "{machine}");
        }
    }

    #[test]
    fn test_every_dither_is_repeatable() {
        let input = gen_random_texture(40, 24, 3, 5);
        for dither in dithers() {
            let settings = MachineSettings {
                dither,
                strength: 70,
                ..Default::default()
            };
            assert_eq!(
                process(Machine::AmstradCpc, &settings, &input),
                process(Machine::AmstradCpc, &settings, &input),
                "{dither}"
            );
        }
    }

    #[test]
    fn test_seq_and_par_agree() {
        let input = gen_gradient_texture(120, 80, 4, 8);
        for machine in Machine::ALL {
            for dither in [Dither::None, Dither::from_index(4).unwrap()] {
                let seq = MachineSettings {
                    dither,
                    parallelism: Parallelism::Seq,
                    ..Default::default()
                };
                let par = MachineSettings {
                    parallelism: Parallelism::Par,
                    ..seq
                };
                assert_eq!(
                    process(machine, &seq, &input),
                    process(machine, &par, &input),
                    "{machine} {dither}"
                );
            }
        }
    }

    #[test]
    fn test_alpha_is_never_written() {
        let input = gen_random_texture(33, 19, 4, 13);
        for machine in Machine::ALL {
            for dither in [Dither::None, Dither::from_index(9).unwrap()] {
                let settings = MachineSettings {
                    dither,
                    ..Default::default()
                };
                let output = process(machine, &settings, &input);
                assert_eq!(alpha(&output), alpha(&input), "{machine} {dither}");
            }
        }
    }
}
