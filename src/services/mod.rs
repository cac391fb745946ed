pub mod simulator;

pub use simulator::{PaletteReport, RenderOutput, RenderRequest, RenderSummary, Simulator, VisualReport};
