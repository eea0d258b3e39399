use std::f64::consts::PI;

/// Largest amplitude of a signed 16-bit sample.
const PCM_AMPLITUDE: f64 = 32767.0;

/// Creates `count` samples of a constant sine tone.
///
/// `volume` scales the amplitude and is expected in [0, 1].
pub fn make_sample(count: usize, rate: u32, volume: f64, frequency: f64) -> Vec<f64> {
    let mut samples = vec![0.0; count];
    fill_sine(&mut samples, rate, volume, frequency);
    samples
}

/// Fills `samples` with a sine tone, sample `i` being `sin(2πi / (rate / frequency)) * volume`.
///
/// A zero frequency or zero rate has no period and produces silence.
pub fn fill_sine(samples: &mut [f64], rate: u32, volume: f64, frequency: f64) {
    if rate == 0 || frequency == 0.0 {
        samples.iter_mut().for_each(|s| *s = 0.0);
        return;
    }

    let period = rate as f64 / frequency;
    for (i, sample) in samples.iter_mut().enumerate() {
        *sample = (2.0 * PI * i as f64 / period).sin() * volume;
    }
}

/// Quantizes mono samples to signed 16-bit PCM, duplicating each one across `channels`.
///
/// Conversion truncates toward zero.
pub fn to_pcm(samples: &[f64], channels: usize) -> Vec<i16> {
    let mut buf = Vec::with_capacity(samples.len() * channels);
    for &f in samples {
        let value = (f * PCM_AMPLITUDE) as i16;
        buf.extend(std::iter::repeat(value).take(channels));
    }

    buf
}
