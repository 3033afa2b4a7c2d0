//! Custom Resource Definitions for the profile controller

mod profile;

pub use profile::{
    OwnerSubject, PluginDeclaration, Profile, ProfileCondition, ProfileSpec, ProfileStatus,
};
