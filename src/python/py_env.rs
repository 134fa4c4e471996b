//! Step environment bindings for Python.

use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{GameConfig, GameError, GameState, SeededDice};
use crate::game::{DixMilleEnv, GameController};
use crate::nn::ObservationEncoder;
use crate::policy::HeuristicPolicy;

fn to_py_err(err: GameError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn state_dict<'py>(py: Python<'py>, state: &GameState) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    let ctx = state.context();
    dict.set_item("scores", state.scores())?;
    dict.set_item("current_player", state.current_player.0)?;
    dict.set_item("turn_number", state.turn_number)?;
    dict.set_item("running_score", ctx.running_score)?;
    dict.set_item("available_count", ctx.available_count)?;
    dict.set_item("at_decision_start", ctx.at_decision_start)?;
    dict.set_item("offered_dice", state.offered_dice().map(<[u8]>::to_vec))?;
    dict.set_item("winner", state.winner.map(|p| p.0))?;
    Ok(dict)
}

/// Python wrapper for the step environment.
///
/// ```python
/// env = dix_mille.DixMilleEnv(player_count=2, seed=7)
/// state = env.reset()
/// while True:
///     action = [True] * env.expected_action_len()
///     state, reward, done, info = env.step(action)
///     if done:
///         break
/// ```
#[pyclass(name = "DixMilleEnv")]
pub struct PyDixMilleEnv {
    env: DixMilleEnv<SeededDice>,
    encoder: ObservationEncoder,
}

#[pymethods]
impl PyDixMilleEnv {
    /// Create a new environment.
    ///
    /// # Arguments
    /// - player_count: Number of seats (1-255)
    /// - seed: RNG seed for deterministic games
    #[new]
    #[pyo3(signature = (player_count = 5, seed = 42))]
    fn new(player_count: usize, seed: u64) -> PyResult<Self> {
        let config = GameConfig::new().with_player_count(player_count);
        let encoder = ObservationEncoder::new(&config);
        let env = DixMilleEnv::new(config, seed).map_err(to_py_err)?;
        Ok(Self { env, encoder })
    }

    /// Start a new game; returns the state dict at the first decision.
    fn reset<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let state = self.env.reset().map_err(to_py_err)?;
        state_dict(py, &state)
    }

    /// Answer the pending decision.
    ///
    /// Returns `(state, reward, done, info)`.
    #[allow(clippy::type_complexity)]
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        action: Vec<bool>,
    ) -> PyResult<(Bound<'py, PyDict>, f32, bool, Bound<'py, PyDict>)> {
        let result = self.env.step(&action).map_err(to_py_err)?;

        let info = PyDict::new_bound(py);
        let events: Vec<String> = result
            .info
            .events
            .iter()
            .map(|r| format!("{:?}", r.event))
            .collect();
        info.set_item("events", events)?;
        info.set_item("acting_player", result.info.acting_player.map(|p| p.0))?;

        Ok((state_dict(py, &result.state)?, result.reward, result.done, info))
    }

    /// Action length the next `step` needs, or None once the game is over.
    fn expected_action_len(&self) -> Option<usize> {
        self.env.expected_action_len()
    }

    /// Observation of the current state as a flat float32 array.
    fn observation<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        let encoded = self.encoder.encode(self.env.state());
        PyArray1::from_vec_bound(py, encoded.tensor)
    }

    /// Size of `observation()`.
    #[getter]
    fn observation_size(&self) -> usize {
        self.encoder.feature_count()
    }

    /// Banked scores in seat order.
    #[getter]
    fn scores(&self) -> Vec<u32> {
        self.env.state().scores()
    }

    #[getter]
    fn winner(&self) -> Option<u8> {
        self.env.state().winner.map(|p| p.0)
    }

    fn __repr__(&self) -> String {
        let state = self.env.state();
        format!(
            "DixMilleEnv(turn={}, current=P{}, scores={:?})",
            state.turn_number,
            state.current_player.0,
            state.scores()
        )
    }
}

/// Play a whole game with the built-in heuristic; returns the winner's seat.
#[pyfunction]
#[pyo3(signature = (player_count = 5, seed = 42))]
pub fn play_heuristic_game(player_count: usize, seed: u64) -> PyResult<u8> {
    let config = GameConfig::new().with_player_count(player_count);
    let mut controller = GameController::new(config).map_err(to_py_err)?;
    let winner = controller
        .play_to_completion(&mut HeuristicPolicy::new(), &mut SeededDice::new(seed))
        .map_err(to_py_err)?;
    Ok(winner.0)
}
