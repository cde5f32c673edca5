pub mod render;
pub mod theme;

pub use render::Renderer;
pub use theme::Theme;
