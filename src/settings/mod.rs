mod store;
mod user;

pub use store::{
    BoolKey, DoubleKey, IntKey, JsonSettingsStore, MemorySettingsStore, SettingValue,
    SettingsStore,
};
pub use user::UserSettings;
