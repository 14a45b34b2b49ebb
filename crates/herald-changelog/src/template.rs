//! Built-in changelog template

/// Markdown template used when no template file is configured
///
/// Renders one release entry followed by the previous file content.
pub const DEFAULT_TEMPLATE: &str = r#"## {{#if version}}[{{version}}]{{else}}Unreleased{{/if}} - {{date}}
{{#each sections}}

### {{title}}

{{#each commits}}
- {{#if scope}}**{{scope}}:** {{/if}}{{subject}} ({{short_hash}}){{#each references}} {{this}}{{/each}}
{{/each}}
{{/each}}
{{#if previous}}

{{previous}}
{{/if}}
"#;
