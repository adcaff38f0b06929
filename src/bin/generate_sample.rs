use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use squeeze_bench::data::configuration::BENCHMARK_PLAN;

/// Mold gap in mm encoded at the start of a configuration label ("3mm 100x100").
fn initial_gap(label: &str) -> f64 {
    label
        .split("mm")
        .next()
        .and_then(|g| g.trim().parse().ok())
        .unwrap_or(3.0)
}

/// Squeeze curve: the gap closes at constant speed while the force grows
/// roughly with 1/h³ (Stefan's law for a Newtonian film).
fn squeeze_curve(h0: f64, samples: usize, rng: &mut SimpleRng) -> Vec<(f64, f64, f64, f64)> {
    let h_end = h0 * 0.25;
    let duration = 20.0;
    let k = 150.0 * rng.uniform(0.8, 1.2);

    (0..samples)
        .map(|i| {
            let frac = i as f64 / (samples - 1) as f64;
            let t = frac * duration;
            let h = h0 - frac * (h0 - h_end);
            let d = h0 - h;
            let force = k * (h0 / h).powi(3) + rng.gauss(0.0, 2.0);
            (t, force.max(0.0), d, h)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// KIT press export: five preamble rows, then t, v, F, d, h.
fn write_kit(path: &Path, curve: &[(f64, f64, f64, f64)]) -> Result<()> {
    let mut text = String::from(
        "Squeeze flow test\nOperator: KIT\nTemperature: 145 \u{b0}C\nChannels: t,v,F,d,h\nUnits: s,mm/s,N,mm,mm\n",
    );
    for &(t, f, d, h) in curve {
        writeln!(text, "{t:.3},{:.4},{f:.3},{d:.4},{h:.4}", -0.1)?;
    }
    // Latin-1 on disk, like the rig software writes it.
    let bytes: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// UT export: one header row, then t, d, F and two LVDT channels.
fn write_ut(path: &Path, curve: &[(f64, f64, f64, f64)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Time", "Displacement", "Force", "LVDT1", "LVDT2"])?;
    for &(t, f, d, _) in curve {
        writer.write_record([
            format!("{t:.3}"),
            format!("{d:.4}"),
            format!("{f:.3}"),
            format!("{:.4}", d * 0.98),
            format!("{:.4}", d * 1.02),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    let kit_dir = out_dir.join("kit");
    let ut_dir = out_dir.join("ut");
    std::fs::create_dir_all(&kit_dir).with_context(|| format!("creating {}", kit_dir.display()))?;
    std::fs::create_dir_all(&ut_dir).with_context(|| format!("creating {}", ut_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let materials = ["CF5050K", "CF503K", "CF6012K"];
    let mut written = 0usize;

    for material in materials {
        for &(label, numbers) in BENCHMARK_PLAN {
            let h0 = initial_gap(label);
            // Two repetitions per configuration are enough to see scatter.
            for &number in numbers.iter().take(2) {
                let curve = squeeze_curve(h0, 200, &mut rng);
                write_kit(&kit_dir.join(format!("kit-{material}-{number}.txt")), &curve)?;
                write_ut(&ut_dir.join(format!("ut-{material}-{number}.csv")), &curve)?;
                written += 2;
            }
        }
    }

    log::info!("Wrote {written} files to {}", out_dir.display());
    println!("Wrote {written} sample files to {}", out_dir.display());
    Ok(())
}
