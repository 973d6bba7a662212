//! Swagger (OpenAPI v2) specification model
//!
//! Parses the `definitions` section of Kubernetes swagger specs.
//!
//! ## Sources
//! - From a cluster: `kubectl proxy && curl http://localhost:8001/openapi/v2`
//! - From GitHub: `https://github.com/kubernetes/kubernetes/blob/master/api/openapi-spec/swagger.json`
//!
//! ## Usage
//! ```rust,ignore
//! use kube_swagger_parser::swagger::SwaggerParser;
//!
//! let document = SwaggerParser::from_file("1.23.9-swagger-spec.json")?.into_document();
//! let pod = document.definition("io.k8s.api.core.v1.Pod");
//! ```

mod parser;
mod types;

pub use parser::SwaggerParser;
pub use types::*;
