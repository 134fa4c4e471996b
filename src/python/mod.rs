//! Python bindings for the Dix Mille engine.
//!
//! # Quick Start
//!
//! ```python
//! import dix_mille
//!
//! env = dix_mille.DixMilleEnv(player_count=5, seed=42)
//! state = env.reset()
//! obs = env.observation()
//!
//! state, reward, done, info = env.step([True] * env.expected_action_len())
//!
//! winner = dix_mille.play_heuristic_game(player_count=3, seed=1)
//! ```

use pyo3::prelude::*;

mod py_env;

pub use py_env::*;

/// dix_mille: the Dix Mille dice game as a step environment.
#[pymodule]
fn dix_mille(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDixMilleEnv>()?;
    m.add_function(wrap_pyfunction!(play_heuristic_game, m)?)?;
    Ok(())
}
