//! Models command implementation
//!
//! Lists the built-in mean functions and correlation kernels and prints a
//! configuration snippet for the default model.

use std::io::Write;

use process_core::{KernelSpec, MeanSpec, ModelSpec};
use serde::Serialize;

use crate::Result;

/// Built-in correlation kernels with their formulas.
pub fn kernels() -> Vec<(KernelSpec, &'static str)> {
    vec![
        (KernelSpec::RationalAbs { alpha: 5.0 }, "1 / (1 + alpha * |t - t'|)"),
        (KernelSpec::Cauchy { alpha: 1.0 }, "1 / (1 + alpha * (t - t')^2)"),
        (KernelSpec::Exponential { alpha: 1.0 }, "exp(-alpha * |t - t'|)"),
        (KernelSpec::WhiteNoise { variance: 1.0 }, "variance if t == t' else 0"),
    ]
}

/// Built-in mean functions with their formulas.
pub fn means() -> Vec<(MeanSpec, &'static str)> {
    vec![
        (MeanSpec::Constant { value: 0.5 }, "value"),
        (MeanSpec::Linear { intercept: 0.0, slope: 1.0 }, "intercept + slope * t"),
    ]
}

#[derive(Serialize)]
struct ModelSection {
    model: ModelSpec,
}

/// Run the models command
pub fn run<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Correlation kernels:")?;
    for (spec, formula) in kernels() {
        writeln!(out, "  {:<40} K(t, t') = {}", inline_toml(&spec)?, formula)?;
    }

    writeln!(out, "\nMean functions:")?;
    for (spec, formula) in means() {
        writeln!(out, "  {:<40} m(t) = {}", inline_toml(&spec)?, formula)?;
    }

    writeln!(out, "\nDefault model:\n")?;
    let section = ModelSection {
        model: ModelSpec::default(),
    };
    write!(out, "{}", toml::to_string(&section)?)?;
    Ok(())
}

/// Renders a spec as a single-line TOML inline table.
fn inline_toml<T: Serialize>(value: &T) -> Result<String> {
    let body = toml::to_string(value)?;
    let fields: Vec<&str> = body.lines().filter(|l| !l.trim().is_empty()).collect();
    Ok(format!("{{ {} }}", fields.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_toml_round_trips() {
        for (spec, _) in kernels() {
            let line = format!("kernel = {}", inline_toml(&spec).unwrap());

            #[derive(serde::Deserialize)]
            struct Wrapper {
                kernel: KernelSpec,
            }
            let parsed: Wrapper = toml::from_str(&line).unwrap();
            assert_eq!(parsed.kernel, spec);
        }
    }

    #[test]
    fn test_listing_contains_every_kernel_and_default_model() {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        for kind in ["rational-abs", "cauchy", "exponential", "white-noise", "linear"] {
            assert!(text.contains(kind), "missing {kind}");
        }

        let snippet = &text[text.find("[model]").unwrap()..];
        #[derive(serde::Deserialize)]
        struct Wrapper {
            model: ModelSpec,
        }
        let parsed: Wrapper = toml::from_str(snippet).unwrap();
        assert_eq!(parsed.model, ModelSpec::default());
    }
}
