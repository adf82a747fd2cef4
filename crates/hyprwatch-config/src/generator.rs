//! Generate a hyprwatch KDL configuration file

use hyprwatch_events::Entity;

use crate::model::Config;

/// Quote a string as a KDL string literal.
fn kdl_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// Arguments of the `subscribe` node for an entity set.
fn subscribe_args(subscribe: Entity) -> Vec<String> {
    if subscribe == Entity::ALL {
        return vec![kdl_string("all")];
    }

    subscribe
        .iter()
        .filter_map(Entity::name)
        .map(kdl_string)
        .collect()
}

fn node_line(name: &str, args: &[String]) -> String {
    if args.is_empty() {
        format!("    {}\n", name)
    } else {
        format!("    {} {}\n", name, args.join(" "))
    }
}

/// Render `config` as a KDL document that `parse_config_str` reads back
/// unchanged.
pub fn generate_default_config(config: &Config) -> String {
    let mut output = String::new();

    output.push_str("// hyprwatch configuration\n");
    output.push_str("// Generated by `hyprwatch generate`\n");
    output.push_str("//\n");
    output.push_str("// Entities: workspace, window, monitor (or \"all\")\n\n");

    output.push_str("global {\n");
    output.push_str(&node_line(
        "log-level",
        &[kdl_string(config.global.log_level.as_str())],
    ));
    output.push_str(&node_line(
        "subscribe",
        &subscribe_args(config.global.subscribe),
    ));
    output.push_str("}\n\n");

    output.push_str("events {\n");
    if config.events.ignore.is_empty() {
        output.push_str("    // ignore \"windowtitle\" \"urgent\"\n");
    } else {
        let names: Vec<String> = config.events.ignore.iter().map(|n| kdl_string(n)).collect();
        output.push_str(&node_line("ignore", &names));
    }
    output.push_str("}\n");

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventsConfig, GlobalConfig, LogLevel};
    use crate::parser::parse_config_str;

    #[test]
    fn test_generate_default() {
        let output = generate_default_config(&Config::default());

        assert!(output.starts_with("// hyprwatch configuration\n"));
        assert!(output.contains("    log-level \"info\"\n"));
        assert!(output.contains("    subscribe \"all\"\n"));
        assert!(output.contains("    // ignore \"windowtitle\" \"urgent\"\n"));
    }

    #[test]
    fn test_generated_config_parses_back() {
        let config = Config {
            global: GlobalConfig {
                log_level: LogLevel::Debug,
                subscribe: Entity::MONITOR | Entity::WORKSPACE,
            },
            events: EventsConfig {
                ignore: vec!["focusedmon".to_string(), "workspacev2".to_string()],
            },
        };

        let output = generate_default_config(&config);
        assert!(output.contains("    subscribe \"workspace\" \"monitor\"\n"));
        assert!(output.contains("    ignore \"focusedmon\" \"workspacev2\"\n"));

        let parsed = parse_config_str(&output).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_generated_default_parses_back() {
        let parsed = parse_config_str(&generate_default_config(&Config::default())).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_kdl_string_escapes() {
        assert_eq!(kdl_string("plain"), "\"plain\"");
        assert_eq!(kdl_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(kdl_string("c:\\dir"), "\"c:\\\\dir\"");
    }
}
