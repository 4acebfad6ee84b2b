//! kotagen generates a typed Kotlin client library from a declarative API
//! description.
//!
//! Input is a JSON document listing data models and HTTP operations (see
//! [`spec::ApiSpec`]). Output is a set of Kotlin source files: gson-annotated
//! data classes under `model/` and Retrofit/RxJava interfaces under `api/`,
//! produced by the two-pass pipeline in [`codegen`].

pub mod codegen;
pub mod error;
pub mod spec;

pub use codegen::{generate, CleanupReport, RenderContext, Renderer, Stage, TeraRenderer};
pub use error::GenError;
pub use spec::ApiSpec;
