//! Python bindings, built with the `python` feature

use std::path::PathBuf;

use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::questions::{select_options, SelectorOptions, Strategy, Strictness};

fn to_py_err(e: QuizError) -> PyErr {
    pyo3::exceptions::PyRuntimeError::new_err(e.to_string())
}

fn parse_strategy(strategy: Option<&str>) -> PyResult<Strategy> {
    match strategy {
        Some(s) => s
            .parse()
            .map_err(|e: String| pyo3::exceptions::PyValueError::new_err(e)),
        None => Ok(Strategy::default()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Returns `([(label, text), ...], correct_label)`.
#[pyfunction]
#[pyo3(name = "select_options", signature = (correct, pool, strategy=None, strict=false, seed=None))]
fn py_select_options(
    correct: &str,
    pool: Vec<String>,
    strategy: Option<&str>,
    strict: bool,
    seed: Option<u64>,
) -> PyResult<(Vec<(String, String)>, String)> {
    let opts = SelectorOptions {
        strictness: if strict { Strictness::Strict } else { Strictness::Lenient },
        ..Default::default()
    };
    let mut rng = make_rng(seed);
    let set = select_options(correct, &pool, parse_strategy(strategy)?, opts, &mut rng)
        .map_err(to_py_err)?;

    let options = set
        .options
        .iter()
        .map(|(label, text)| (label.to_string(), text.clone()))
        .collect();
    Ok((options, set.correct_label.to_string()))
}

/// Generate a quiz file and return the number of questions written.
#[pyfunction]
#[pyo3(name = "generate", signature = (input, output, strategy=None, seed=None))]
fn py_generate(
    input: PathBuf,
    output: PathBuf,
    strategy: Option<&str>,
    seed: Option<u64>,
) -> PyResult<usize> {
    let config = QuizConfig {
        input: Some(input),
        output: Some(output),
        strategy: Some(parse_strategy(strategy)?),
        seed,
        ..Default::default()
    };
    let report = crate::generate::run(&config).map_err(to_py_err)?;
    Ok(report.document.total_questions)
}

/// Idiom Quiz Python Module
#[pymodule]
fn idiom_quiz(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_select_options, m)?)?;
    m.add_function(wrap_pyfunction!(py_generate, m)?)?;
    Ok(())
}
