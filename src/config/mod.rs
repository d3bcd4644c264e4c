/// Loading of registry and logging settings.
pub mod settings;

pub use self::settings::Settings;
