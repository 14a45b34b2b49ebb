//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "herald.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "herald.yaml";

/// Config file names, in lookup order within one directory
pub const CONFIG_FILE_NAMES: &[&str] = &[
    DEFAULT_CONFIG_TOML,
    DEFAULT_CONFIG_YAML,
    ".herald.toml",
    ".herald.yaml",
];

/// Default configuration template written by `herald init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Herald configuration

[git]
# from = "v1.0.0"
to = "HEAD"

[changelog]
file = "CHANGELOG.md"
# template = "changelog.hbs"
sort_by = ["scope", "subject"]
section_order = ["feat", "fix", "perf", "docs"]
breaking_section = "⚠ BREAKING CHANGES"
include_merges = true

[changelog.types.feat]
section = "Features"

[changelog.types.fix]
section = "Bug Fixes"

[changelog.types.perf]
section = "Performance"

[changelog.types.docs]
section = "Documentation"

[changelog.types.refactor]
section = "Refactoring"
hidden = true

[changelog.types.chore]
section = "Chores"
hidden = true
"#;
