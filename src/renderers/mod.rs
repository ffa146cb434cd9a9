//! Presentation backends for [`Renderer`](crate::pipeline::Renderer).

pub mod headless;
pub mod image;
pub mod terminal;
pub mod window;

pub use self::image::ImagePresenter;
pub use headless::HeadlessPresenter;
pub use terminal::TerminalPresenter;
pub use window::WindowPresenter;
