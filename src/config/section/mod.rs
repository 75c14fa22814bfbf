//! Configuration section definitions.
//!
//! Each module corresponds to a section in `litepack.toml`:
//!
//! | Module    | TOML Section                | Purpose                          |
//! |-----------|-----------------------------|----------------------------------|
//! | `product` | `[product]`                 | Artifact name and version        |
//! | `header`  | `[header]`                  | License header block             |
//! | `build`   | `[build]`                   | Output dir, failure policy, jobs |
//! | `js`      | `[js]`, `[js.minifier]`     | JS target and external tool      |
//! | `css`     | `[css]`                     | CSS target                       |
//! | `deploy`  | `[deploy]`                  | scp destination                  |
//! | `package` | `[package]`                 | Source tarball                   |

mod build;
mod css;
mod deploy;
mod header;
mod js;
mod package;
mod product;

pub use build::BuildSectionConfig;
pub use css::CssConfig;
pub use deploy::DeployConfig;
pub use header::HeaderConfig;
pub use js::JsConfig;
pub use package::PackageConfig;
pub use product::ProductConfig;
