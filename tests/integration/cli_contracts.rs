use clap::Parser;
use kvdir::audit::AuditRecorder;
use kvdir::config::ConfigLoader;
use kvdir::tooling::cli::{Cli, CliContext, Commands};
use std::io::Write;

const CONFIG: &str = r#"
default_cluster = "local"

[[clusters]]
name = "local"
title = "Local scratch"
backend = { type = "memory" }

[[clusters.members]]
id = 1
name = "local-1"
is_leader = true

[[clusters]]
name = "restricted"
roles = ["ops"]
backend = { type = "memory" }

[[users]]
username = "olga"
role = "ops"
"#;

fn context(user: &str, cluster: Option<&str>) -> CliContext {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    let config = ConfigLoader::load_from_file(file.path()).unwrap();
    CliContext::new(
        &config,
        cluster.map(str::to_string),
        user.to_string(),
        AuditRecorder::disabled(),
    )
    .unwrap()
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["kvdir", "list"],
        vec!["kvdir", "ls", "/a", "--format", "json"],
        vec!["kvdir", "get", "/a/b"],
        vec!["kvdir", "put", "/a/b", "value", "--create"],
        vec!["kvdir", "mkdir", "/a"],
        vec!["kvdir", "rm", "/a", "-r", "-y"],
        vec!["kvdir", "tree", "/a", "--format", "toml"],
        vec!["kvdir", "members", "--format", "json"],
        vec!["kvdir", "--cluster", "restricted", "clusters"],
        vec!["kvdir", "--config", "/tmp/kvdir.toml", "actions"],
        vec!["kvdir", "users", "--format", "json"],
    ];
    for case in cases {
        assert!(Cli::try_parse_from(&case).is_ok(), "failed to parse {:?}", case);
    }
    assert!(Cli::try_parse_from(["kvdir", "put", "/a"]).is_err());
}

#[test]
fn members_json_contract() {
    let output = context("anyone", None)
        .execute(&Commands::Members {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["id"], 1);
    assert_eq!(parsed[0]["name"], "local-1");
    assert_eq!(parsed[0]["is_leader"], true);
}

#[test]
fn clusters_filtered_by_role() {
    let visible = |user: &str| -> Vec<String> {
        let output = context(user, None)
            .execute(&Commands::Clusters {
                format: "json".to_string(),
            })
            .unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        parsed
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(visible("anyone"), vec!["local"]);
    assert_eq!(visible("olga"), vec!["local", "restricted"]);
}

#[test]
fn restricted_cluster_requires_role() {
    let denied = context("anyone", Some("restricted")).execute(&Commands::List {
        path: "/".to_string(),
        format: "text".to_string(),
    });
    assert!(matches!(
        denied,
        Err(kvdir::NamespaceError::Unauthorized(_))
    ));

    let ctx = context("olga", Some("restricted"));
    ctx.execute(&Commands::Put {
        path: "/ops/flag".to_string(),
        value: "on".to_string(),
        create: true,
    })
    .unwrap();
    let tree = ctx
        .execute(&Commands::Tree {
            path: "/".to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&tree).unwrap();
    assert_eq!(parsed, serde_json::json!({"ops": {"flag": "on"}}));
}

#[test]
fn get_json_contract_has_required_fields() {
    let ctx = context("anyone", None);
    ctx.execute(&Commands::Mkdir {
        path: "/dir".to_string(),
    })
    .unwrap();
    let output = ctx
        .execute(&Commands::Get {
            path: "/dir".to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["full_path"], "/dir");
    assert_eq!(parsed["name"], "dir");
    assert_eq!(parsed["is_dir"], true);
    assert!(parsed.get("value").is_none());
}

#[test]
fn users_json_contract() {
    let output = context("anyone", None)
        .execute(&Commands::Users {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, serde_json::json!([{"name": "olga", "role": "ops"}]));
}
