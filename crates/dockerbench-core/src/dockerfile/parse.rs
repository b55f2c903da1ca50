//! Dockerfile text parser.
//!
//! Turns raw Dockerfile text into the `Node` sequence consumed by
//! `instructions::model`. Tokenization follows the node shapes produced by
//! buildkit's parser closely enough for rule evaluation:
//!
//! - shell-form `RUN`/`CMD`/`ENTRYPOINT`/`SHELL` keep the command as one token
//! - JSON exec form yields one token per array element
//! - `ENV`/`LABEL`/`ARG` yield alternating name and value tokens
//! - everything else is split on whitespace
//! - heredoc bodies (`RUN <<EOF`) are appended to their instruction's
//!   arguments, one token per body
//!
//! Build semantics (variable expansion, stage resolution) are out of scope.

use thiserror::Error;

use crate::dockerfile::node::Node;

const DEFAULT_ESCAPE: char = '\\';

/// Directives whose leading `--name=value` words are parsed as flags.
const FLAG_DIRECTIVES: &[&str] = &["from", "run", "copy", "add", "healthcheck"];

/// Directives whose arguments may open heredocs.
const HEREDOC_DIRECTIVES: &[&str] = &["run", "copy", "add"];

/// Directives that are meaningless without arguments.
const REQUIRES_ARGUMENTS: &[&str] = &["from", "run", "user", "copy", "add", "env", "label"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: {directive} requires at least one argument")]
    MissingArguments { line: usize, directive: String },

    #[error("line {line}: heredoc {word} is never terminated")]
    UnterminatedHeredoc { line: usize, word: String },

    #[error("no instructions found")]
    EmptyDocument,
}

/// A heredoc opened by `<<WORD` or `<<-WORD`.
#[derive(Debug, PartialEq, Eq)]
struct Heredoc {
    word: String,
    strip_tabs: bool,
}

/// Parse Dockerfile text into an ordered node sequence.
pub fn parse_dockerfile(text: &str) -> Result<Vec<Node>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let escape = detect_escape(text);

    let mut nodes = Vec::new();
    let mut pending = String::new();
    let mut start_line = 0;

    let mut lines = text.lines().enumerate();
    while let Some((idx, raw)) = lines.next() {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            // Comments inside a continuation are dropped as well.
            continue;
        }

        if pending.is_empty() {
            start_line = idx + 1;
        }

        match trimmed.strip_suffix(escape) {
            Some(head) => {
                pending.push_str(head.trim_end());
                pending.push(' ');
            }
            None => {
                pending.push_str(trimmed);
                let logical = std::mem::take(&mut pending);
                let mut node = parse_line(&logical, start_line)?;
                for heredoc in heredocs(&node) {
                    let body = read_heredoc(&mut lines, &heredoc, start_line)?;
                    node.args.push(body);
                }
                nodes.push(node);
            }
        }
    }

    // A trailing continuation at end of file still forms an instruction.
    let tail = pending.trim();
    if !tail.is_empty() {
        nodes.push(parse_line(tail, start_line)?);
    }

    if nodes.is_empty() {
        return Err(ParseError::EmptyDocument);
    }

    Ok(nodes)
}

/// Reads the `# escape=` parser directive from the top of the file.
fn detect_escape(text: &str) -> char {
    for line in text.lines() {
        let trimmed = line.trim();
        let Some(comment) = trimmed.strip_prefix('#') else {
            break;
        };
        let Some((key, value)) = comment.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("escape") && value.trim() == "`" {
            return '`';
        }
    }
    DEFAULT_ESCAPE
}

fn parse_line(line: &str, line_no: usize) -> Result<Node, ParseError> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };
    let directive = word.to_lowercase();

    let (flags, rest) = if FLAG_DIRECTIVES.contains(&directive.as_str()) {
        extract_flags(rest)
    } else {
        (Vec::new(), rest)
    };

    let args = tokenize(&directive, rest.trim());

    if args.is_empty() && REQUIRES_ARGUMENTS.contains(&directive.as_str()) {
        return Err(ParseError::MissingArguments {
            line: line_no,
            directive,
        });
    }

    Ok(Node {
        directive,
        flags,
        args,
    })
}

/// Heredocs opened by a `RUN`/`COPY`/`ADD` line, in order of appearance.
fn heredocs(node: &Node) -> Vec<Heredoc> {
    if !HEREDOC_DIRECTIVES.contains(&node.directive.as_str()) {
        return Vec::new();
    }
    node.args
        .iter()
        .flat_map(|arg| arg.split_whitespace())
        .filter_map(heredoc_marker)
        .collect()
}

fn heredoc_marker(word: &str) -> Option<Heredoc> {
    let rest = word.strip_prefix("<<")?;
    let (strip_tabs, rest) = match rest.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let name = rest.trim_matches(|c| c == '"' || c == '\'');
    let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
    if name.is_empty() || !name.chars().all(valid) {
        return None;
    }
    Some(Heredoc {
        word: name.to_string(),
        strip_tabs,
    })
}

/// Consume raw lines up to the terminator. Body lines are kept verbatim:
/// no comment skipping, no continuation joining.
fn read_heredoc<'a, I>(lines: &mut I, heredoc: &Heredoc, line_no: usize) -> Result<String, ParseError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut body = String::new();
    for (_, raw) in lines.by_ref() {
        let line = if heredoc.strip_tabs {
            raw.trim_start_matches('\t')
        } else {
            raw
        };
        if line == heredoc.word {
            return Ok(body);
        }
        body.push_str(line);
        body.push('\n');
    }
    Err(ParseError::UnterminatedHeredoc {
        line: line_no,
        word: heredoc.word.clone(),
    })
}

fn extract_flags(mut rest: &str) -> (Vec<String>, &str) {
    let mut flags = Vec::new();
    while rest.starts_with("--") {
        let (flag, tail) = match rest.split_once(char::is_whitespace) {
            Some((flag, tail)) => (flag, tail.trim_start()),
            None => (rest, ""),
        };
        flags.push(flag.to_string());
        rest = tail;
    }
    (flags, rest)
}

fn tokenize(directive: &str, rest: &str) -> Vec<String> {
    match directive {
        "run" | "cmd" | "entrypoint" | "shell" => {
            exec_form(rest).unwrap_or_else(|| whole(rest))
        }
        "copy" | "add" | "volume" => exec_form(rest).unwrap_or_else(|| words(rest)),
        "env" | "label" | "arg" => name_values(rest),
        "healthcheck" => healthcheck(rest),
        _ => words(rest),
    }
}

/// JSON array form, e.g. `["nginx", "-g", "daemon off;"]`.
/// Anything that does not parse as a string array falls back to shell form.
fn exec_form(rest: &str) -> Option<Vec<String>> {
    if !rest.starts_with('[') {
        return None;
    }
    serde_json::from_str::<Vec<String>>(rest).ok()
}

fn whole(rest: &str) -> Vec<String> {
    if rest.is_empty() {
        Vec::new()
    } else {
        vec![rest.to_string()]
    }
}

fn words(rest: &str) -> Vec<String> {
    rest.split_whitespace().map(String::from).collect()
}

fn name_values(rest: &str) -> Vec<String> {
    let words = split_quoted_words(rest);
    let Some(first) = words.first() else {
        return Vec::new();
    };

    // Legacy `ENV KEY value with spaces` form: one name, one value.
    if !first.contains('=') {
        let mut tokens = vec![first.clone()];
        if let Some((_, value)) = rest.split_once(char::is_whitespace) {
            let value = value.trim();
            if !value.is_empty() {
                tokens.push(value.to_string());
            }
        }
        return tokens;
    }

    words
        .into_iter()
        .flat_map(|word| match word.split_once('=') {
            Some((name, value)) => vec![name.to_string(), value.to_string()],
            None => vec![word],
        })
        .collect()
}

fn healthcheck(rest: &str) -> Vec<String> {
    if rest.eq_ignore_ascii_case("none") {
        return vec!["none".to_string()];
    }

    match rest.split_once(char::is_whitespace) {
        Some((word, command)) if word.eq_ignore_ascii_case("cmd") => {
            let command = command.trim();
            let mut tokens = vec!["cmd".to_string()];
            tokens.extend(exec_form(command).unwrap_or_else(|| whole(command)));
            tokens
        }
        _ => words(rest),
    }
}

/// Whitespace split that honours single and double quotes and strips them.
fn split_quoted_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Node> {
        parse_dockerfile(text).expect("dockerfile should parse")
    }

    #[test]
    fn shell_form_run_is_a_single_token() {
        let nodes = parse("FROM alpine\nRUN apk update && apk add curl\n");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].directive, "from");
        assert_eq!(nodes[0].args, vec!["alpine"]);
        assert_eq!(nodes[1].directive, "run");
        assert_eq!(nodes[1].args, vec!["apk update && apk add curl"]);
    }

    #[test]
    fn exec_form_yields_one_token_per_element() {
        let nodes = parse(r#"CMD ["nginx", "-g", "daemon off;"]"#);

        assert_eq!(nodes[0].args, vec!["nginx", "-g", "daemon off;"]);
    }

    #[test]
    fn malformed_exec_form_falls_back_to_shell_form() {
        let nodes = parse("RUN [not json\n");

        assert_eq!(nodes[0].args, vec!["[not json"]);
    }

    #[test]
    fn directives_are_lower_cased() {
        let nodes = parse("from alpine\nHealthCheck NONE\n");

        assert_eq!(nodes[0].directive, "from");
        assert_eq!(nodes[1].directive, "healthcheck");
        assert_eq!(nodes[1].args, vec!["none"]);
    }

    #[test]
    fn line_continuations_are_joined() {
        let nodes = parse(
            "RUN apt-get update \\\n    # a comment in the middle\n    && apt-get install -y curl\n",
        );

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].args, vec!["apt-get update && apt-get install -y curl"]);
    }

    #[test]
    fn backtick_escape_directive_is_honoured() {
        let nodes = parse("# escape=`\nFROM mcr.microsoft.com/windows\nRUN dir `\n  c:\\\n");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].args, vec!["dir c:\\"]);
    }

    #[test]
    fn flags_are_split_from_arguments() {
        let nodes = parse(
            "FROM --platform=linux/amd64 golang:1.22 AS build\nCOPY --from=build --chown=app:app /out /app\n",
        );

        assert_eq!(nodes[0].flags, vec!["--platform=linux/amd64"]);
        assert_eq!(nodes[0].args, vec!["golang:1.22", "AS", "build"]);
        assert_eq!(nodes[1].flags, vec!["--from=build", "--chown=app:app"]);
        assert_eq!(nodes[1].args, vec!["/out", "/app"]);
    }

    #[test]
    fn cmd_keeps_double_dash_words_as_arguments() {
        let nodes = parse("CMD --help\n");

        assert!(nodes[0].flags.is_empty());
        assert_eq!(nodes[0].args, vec!["--help"]);
    }

    #[test]
    fn env_pairs_become_name_value_tokens() {
        let nodes = parse("ENV APP_HOME=/app GREETING=\"hello world\"\n");

        assert_eq!(
            nodes[0].args,
            vec!["APP_HOME", "/app", "GREETING", "hello world"]
        );
    }

    #[test]
    fn legacy_env_form_keeps_value_whole() {
        let nodes = parse("ENV DB_PASSWORD super secret value\n");

        assert_eq!(nodes[0].args, vec!["DB_PASSWORD", "super secret value"]);
    }

    #[test]
    fn label_pairs_become_name_value_tokens() {
        let nodes = parse("LABEL maintainer='ops@example.com' version=1\n");

        assert_eq!(
            nodes[0].args,
            vec!["maintainer", "ops@example.com", "version", "1"]
        );
    }

    #[test]
    fn healthcheck_cmd_keeps_command_whole() {
        let nodes = parse("HEALTHCHECK --interval=30s CMD curl -f http://localhost/ || exit 1\n");

        assert_eq!(nodes[0].flags, vec!["--interval=30s"]);
        assert_eq!(
            nodes[0].args,
            vec!["cmd", "curl -f http://localhost/ || exit 1"]
        );
    }

    #[test]
    fn missing_arguments_are_reported_with_line() {
        let err = parse_dockerfile("FROM alpine\n\nUSER\n").unwrap_err();

        assert_eq!(
            err,
            ParseError::MissingArguments {
                line: 3,
                directive: "user".into()
            }
        );
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let nodes = parse("\u{feff}FROM ubuntu\nUSER app\n");

        assert_eq!(nodes[0].directive, "from");
        assert_eq!(nodes[0].args, vec!["ubuntu"]);
    }

    #[test]
    fn heredoc_body_is_appended_to_run() {
        let nodes = parse(
            "FROM debian\nRUN <<EOF\napt-get update\n# not a comment here\napt-get install -y netcat\nEOF\nUSER app\n",
        );

        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes[1].args,
            vec![
                "<<EOF",
                "apt-get update\n# not a comment here\napt-get install -y netcat\n"
            ]
        );
        assert_eq!(nodes[2].directive, "user");
    }

    #[test]
    fn heredoc_body_lines_are_not_instructions() {
        let nodes = parse("FROM alpine\nRUN <<-SCRIPT bash\n\tuser\n\tadd\n\tSCRIPT\n");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].args, vec!["<<-SCRIPT bash", "user\nadd\n"]);
    }

    #[test]
    fn several_heredocs_on_one_line_are_read_in_order() {
        let nodes = parse(
            "COPY <<one.txt <<\"two\" /dst/\nfirst\none.txt\nsecond\ntwo\n",
        );

        assert_eq!(nodes.len(), 1);
        assert_eq!(
            nodes[0].args,
            vec!["<<one.txt", "<<\"two\"", "/dst/", "first\n", "second\n"]
        );
    }

    #[test]
    fn here_strings_and_cmd_are_not_heredocs() {
        let nodes = parse("RUN cat <<<hello\nCMD <<EOF\n");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].args, vec!["cat <<<hello"]);
        assert_eq!(nodes[1].args, vec!["<<EOF"]);
    }

    #[test]
    fn unterminated_heredoc_is_an_error() {
        let err = parse_dockerfile("FROM alpine\nRUN <<EOF\necho hi\n").unwrap_err();

        assert_eq!(
            err,
            ParseError::UnterminatedHeredoc {
                line: 2,
                word: "EOF".into()
            }
        );
    }

    #[test]
    fn comment_only_document_is_empty() {
        let err = parse_dockerfile("# nothing here\n\n").unwrap_err();
        assert_eq!(err, ParseError::EmptyDocument);
    }
}
