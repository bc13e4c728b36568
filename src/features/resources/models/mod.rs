mod resource;

pub use resource::{NewResource, Resource, ResourceType};
