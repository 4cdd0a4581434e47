use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

// Drives the real binary over stdio with newline-delimited JSON-RPC.
struct McpProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl McpProcess {
    fn spawn(registry_url: &str, search_url: &str) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_hexdocs-mcp"))
            .args([
                "--server-type",
                "stdio",
                "--registry-url",
                registry_url,
                "--search-url",
                search_url,
                "--lookup-timeout-secs",
                "2",
                "--search-timeout-secs",
                "2",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start server");

        let stdin = child.stdin.take().expect("Failed to open stdin");
        let stdout = BufReader::new(child.stdout.take().expect("Failed to open stdout"));
        let mut process = Self { child, stdin, stdout };
        process.initialize();
        process
    }

    fn send(&mut self, message: Value) {
        writeln!(self.stdin, "{}", message).expect("Failed to write to stdin");
        self.stdin.flush().expect("Failed to flush stdin");
    }

    fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("Failed to read from stdout");
        serde_json::from_str(&line).expect("Failed to parse JSON")
    }

    fn request(&mut self, id: u64, method: &str, params: Value) -> Value {
        self.send(json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }));
        let response = self.recv();
        assert_eq!(response["id"], id);
        response
    }

    fn initialize(&mut self) {
        let response = self.request(
            0,
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "integration test", "version": "0.0.1" }
            }),
        );
        assert!(response["result"]["capabilities"]["tools"].is_object());
        assert_eq!(response["result"]["serverInfo"]["name"], "Hexdocs search");
        self.send(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }));
    }

    fn call_search(&mut self, id: u64, arguments: Value) -> Value {
        self.request(id, "tools/call", json!({ "name": "search", "arguments": arguments }))
    }
}

impl Drop for McpProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn text_of(response: &Value) -> &str {
    let content = response["result"]["content"].as_array().expect("Expected content array");
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["type"], "text");
    content[0]["text"].as_str().expect("Expected text content")
}

#[test]
fn test_lists_single_search_tool() {
    let mut mcp = McpProcess::spawn("http://127.0.0.1:1/api/packages", "http://127.0.0.1:1/search");

    let response = mcp.request(1, "tools/list", json!({}));
    let tools = response["result"]["tools"].as_array().expect("Expected tools array");

    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "search");
    let required = tools[0]["inputSchema"]["required"].as_array().unwrap();
    assert!(required.contains(&json!("packages")));
    assert!(required.contains(&json!("query")));
}

#[test]
fn test_search_end_to_end() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/packages/ecto")
        .with_status(200)
        .with_body(json!({ "releases": [{ "version": "3.11.2" }, { "version": "3.11.1" }] }).to_string())
        .create();
    server
        .mock("GET", "/api/packages/phoenix")
        .with_status(200)
        .with_body(json!({ "releases": [{ "version": "1.7.14" }] }).to_string())
        .create();
    server
        .mock("GET", "/api/packages/not_a_package")
        .with_status(404)
        .create();
    let search = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "parse".into()),
            Matcher::UrlEncoded("query_by".into(), "doc,title".into()),
            Matcher::AnyOf(vec![
                Matcher::UrlEncoded("filter_by".into(), "package:=ecto-3.11.2&phoenix-1.7.14".into()),
                Matcher::UrlEncoded("filter_by".into(), "package:=phoenix-1.7.14&ecto-3.11.2".into()),
            ]),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "found": 2,
                "request_params": { "q": "parse" },
                "hits": [
                    { "document": { "title": "A", "package": "p", "ref": "p.html", "type": "function", "doc": "body" } },
                    { "document": { "title": "B", "package": "p", "ref": "p2.html", "type": "function" } }
                ]
            })
            .to_string(),
        )
        .create();

    let url = server.url();
    let mut mcp = McpProcess::spawn(&format!("{url}/api/packages"), &format!("{url}/search"));
    let response = mcp.call_search(
        1,
        json!({ "packages": ["ecto", "not_a_package", "phoenix"], "query": "parse" }),
    );
    search.assert();

    let text = text_of(&response);
    assert_eq!(text.lines().next(), Some("Found 2 results for \"parse\""));
    assert!(text.contains("1. A [p]\n   Ref: p.html\n   Type: function\n\nbody\n"));
    assert!(text.contains("2. B [p]\n   Ref: p2.html\n   Type: function\n\n\n----------\n"));
}

#[test]
fn test_unreachable_upstream_is_reported_in_text() {
    let mut mcp = McpProcess::spawn("http://127.0.0.1:1/api/packages", "http://127.0.0.1:1/search");

    let response = mcp.call_search(1, json!({ "packages": ["ecto"], "query": "Repo" }));

    assert!(response.get("error").is_none());
    assert_eq!(text_of(&response), "Error: Failed to retrieve search results.");
}

#[test]
fn test_malformed_arguments_are_rejected() {
    let mut mcp = McpProcess::spawn("http://127.0.0.1:1/api/packages", "http://127.0.0.1:1/search");

    let missing_query = mcp.call_search(1, json!({ "packages": ["ecto"] }));
    assert!(missing_query["error"].is_object());

    let wrong_type = mcp.call_search(2, json!({ "packages": "ecto", "query": "Repo" }));
    assert!(wrong_type["error"].is_object());
}
