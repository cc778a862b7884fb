use crate::value_objects::tick::Tick;

/// Produces the ordered tick sequence for a run.
pub trait TickSource {
    fn describe(&self) -> String;

    fn load_ticks(&self) -> Result<Vec<Tick>, String>;
}
