use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Layered synthetic section with additive Gaussian noise.
///
/// Reflectors dip gently along inline and crossline so that every slicing
/// axis shows structure. Samples are laid out `(inline, crossline, time)`.
pub fn layered_volume(shape: [usize; 3], noise: f32, seed: u64) -> Vec<f32> {
    let [d, h, w] = shape;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(d * h * w);

    for i in 0..d {
        for j in 0..h {
            let shift = 0.08 * i as f32 + 0.05 * j as f32;
            for k in 0..w {
                let t = k as f32 + shift;
                let signal = (t * 0.35).sin() * 50.0 + (t * 0.09).cos() * 20.0;
                values.push(signal + noise * rng.sample::<f32, _>(StandardNormal));
            }
        }
    }
    values
}
