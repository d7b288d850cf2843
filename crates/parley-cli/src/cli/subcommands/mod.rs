mod profile;

pub use profile::{ProfileAvatarArgs, ProfileCommands, ProfileSetArgs};
