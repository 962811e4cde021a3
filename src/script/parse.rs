use crate::editor::Connection;
use crate::graph::{Handle, Position};
use crate::script::{Command, Step};
use anyhow::{Context, bail};
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// One compiled pattern per command keyword.
struct Patterns {
    node: Regex,
    connect: Regex,
    delete: Regex,
    moved: Regex,
    bare: Regex,
}

impl Patterns {
    fn new() -> anyhow::Result<Self> {
        Ok(Self {
            // node <id> <label...> [kind=<kind>]
            node: Regex::new(r#"^node\s+(\S+)\s+(.+?)(?:\s+kind=(\S+))?\s*$"#)?,
            // connect <src>[:<handle>] <dst>[:<handle>]
            connect: Regex::new(r#"^connect\s+([^\s:]+)(?::(\S+))?\s+([^\s:]+)(?::(\S+))?\s*$"#)?,
            // delete-node <id>... / delete-edge <id>...
            delete: Regex::new(r#"^delete-(node|edge)((?:\s+\S+)+)\s*$"#)?,
            // move <id> <x> <y>
            moved: Regex::new(
                r#"^move\s+(\S+)\s+(-?[0-9]+(?:\.[0-9]+)?)\s+(-?[0-9]+(?:\.[0-9]+)?)\s*$"#,
            )?,
            // layout / undo
            bare: Regex::new(r#"^(layout|undo)\s*$"#)?,
        })
    }
}

/// Read and parse an edit script file.
pub fn parse_script_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<Step>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("read script file {}", path.display()))?;
    parse_script(&text, &path.display().to_string())
}

/// Parse edit-script text. `origin` names the source in error messages.
///
/// One command per line; blank lines and lines starting with '#' are skipped.
///
/// Example:
/// node 1 extract kind=input
/// node 2 load
/// connect 1 2
/// undo
pub fn parse_script(text: &str, origin: &str) -> anyhow::Result<Vec<Step>> {
    let re = Patterns::new()?;

    let mut out = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let keyword = line.split_whitespace().next().unwrap_or_default();
        let caps = match keyword {
            "node" => re.node.captures(line),
            "connect" => re.connect.captures(line),
            "delete-node" | "delete-edge" => re.delete.captures(line),
            "move" => re.moved.captures(line),
            "layout" | "undo" => re.bare.captures(line),
            other => bail!(
                "script parse error at {}:{}: unknown command {:?}",
                origin,
                lno,
                other
            ),
        };
        let Some(caps) = caps else {
            bail!(
                "script parse error at {}:{}: cannot parse line: {:?}",
                origin,
                lno,
                line
            );
        };

        let command = build_command(keyword, &caps)
            .with_context(|| format!("script parse error at {}:{}", origin, lno))?;
        out.push(Step { line: lno, command });
    }

    Ok(out)
}

fn build_command(keyword: &str, caps: &Captures<'_>) -> anyhow::Result<Command> {
    let command = match keyword {
        "node" => Command::Node {
            id: caps[1].to_string(),
            label: caps[2].to_string(),
            kind: caps.get(3).map(|m| m.as_str().to_string()),
        },
        "connect" => {
            let source_handle = parse_handle(caps.get(2).map(|m| m.as_str()), Handle::Out)?;
            let target_handle = parse_handle(caps.get(4).map(|m| m.as_str()), Handle::In)?;
            Command::Connect(
                Connection::new(&caps[1], &caps[3]).with_handles(source_handle, target_handle),
            )
        }
        "delete-node" | "delete-edge" => {
            let ids = caps[2].split_whitespace().map(str::to_string).collect();
            if &caps[1] == "node" {
                Command::DeleteNodes(ids)
            } else {
                Command::DeleteEdges(ids)
            }
        }
        "move" => {
            let x: f64 = caps[2].parse().with_context(|| format!("bad x {}", &caps[2]))?;
            let y: f64 = caps[3].parse().with_context(|| format!("bad y {}", &caps[3]))?;
            Command::Move {
                id: caps[1].to_string(),
                position: Position::new(x, y),
            }
        }
        "layout" => Command::Layout,
        "undo" => Command::Undo,
        other => bail!("unknown command {:?}", other),
    };
    Ok(command)
}

fn parse_handle(s: Option<&str>, default: Handle) -> anyhow::Result<Handle> {
    match s {
        Some(s) => s.parse(),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn commands(text: &str) -> Vec<Command> {
        parse_script(text, "test.script")
            .unwrap()
            .into_iter()
            .map(|s| s.command)
            .collect()
    }

    #[test]
    fn parses_every_command() {
        let got = commands(
            "# build a pipeline\n\
             node 1 extract raw rows kind=input\n\
             node 2 load\n\
             \n\
             connect 1 2\n\
             connect 2:in 1:out\n\
             move 1 -10 2.5\n\
             layout\n\
             delete-edge e1out-2in\n\
             delete-node 1 2\n\
             undo\n",
        );
        assert_eq!(
            got,
            vec![
                Command::Node {
                    id: "1".into(),
                    label: "extract raw rows".into(),
                    kind: Some("input".into()),
                },
                Command::Node {
                    id: "2".into(),
                    label: "load".into(),
                    kind: None,
                },
                Command::Connect(Connection::new("1", "2")),
                Command::Connect(Connection::new("2", "1").with_handles(Handle::In, Handle::Out)),
                Command::Move {
                    id: "1".into(),
                    position: Position::new(-10.0, 2.5),
                },
                Command::Layout,
                Command::DeleteEdges(vec!["e1out-2in".into()]),
                Command::DeleteNodes(vec!["1".into(), "2".into()]),
                Command::Undo,
            ]
        );
    }

    #[test]
    fn steps_keep_source_line_numbers() {
        let steps = parse_script("\n# c\nlayout\n\nundo\n", "s").unwrap();
        let lines: Vec<usize> = steps.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[test]
    fn unknown_command_names_line() {
        let err = parse_script("layout\nexplode 1\n", "pipe.script").unwrap_err();
        assert!(format!("{err:#}").contains("pipe.script:2"), "{err:#}");
        assert!(format!("{err:#}").contains("explode"));
    }

    #[test]
    fn malformed_lines_are_errors() {
        for bad in ["node 1", "connect 1", "move a 1", "delete-node", "undo now", "connect a:up b"] {
            assert!(parse_script(bad, "s").is_err(), "{bad}");
        }
    }
}
