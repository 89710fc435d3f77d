use git_ignore::error::{Error, Result};
use git_ignore::provider::http::FetchResponse;
use git_ignore::provider::{Fetcher, HttpProvider, Provider, Source};
use reqwest::StatusCode;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use url::Url;

const BASE_URL: &str = "http://localhost:8080/api";

/// Serves canned responses by URL path and records every request.
#[derive(Default)]
struct FakeFetcher {
    responses: HashMap<String, (StatusCode, String)>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl FakeFetcher {
    fn respond(mut self, path: &str, status: StatusCode, body: &str) -> Self {
        self.responses.insert(path.to_string(), (status, body.to_string()));
        self
    }
}

impl Fetcher for FakeFetcher {
    fn get(&self, url: &Url) -> Result<FetchResponse> {
        self.requests.borrow_mut().push(url.to_string());
        match self.responses.get(url.path()) {
            Some((status, body)) => Ok(FetchResponse { status: *status, body: body.clone() }),
            None => Err(Error::RetrievalError(format!("connection refused: {url}"))),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Builds a body the way the service does, banner and footer included.
fn generate_response(responses: &[(&str, &str)]) -> String {
    let options = responses.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(",");
    let mut body = format!("# Created by https://www.toptal.com/developers/gitignore/api/{options}\n");
    body.push_str(&format!(
        "# Edit at https://www.toptal.com/developers/gitignore?templates={options}\n"
    ));
    for (_, content) in responses {
        body.push_str(content);
        body.push('\n');
    }
    body.push_str(&format!("# End of https://www.toptal.com/developers/gitignore/api/{options}\n"));
    body
}

fn build_provider(fetcher: FakeFetcher) -> (HttpProvider, Rc<RefCell<Vec<String>>>) {
    let requests = Rc::clone(&fetcher.requests);
    (HttpProvider::new(BASE_URL, Box::new(fetcher)).unwrap(), requests)
}

fn listing() -> FakeFetcher {
    FakeFetcher::default().respond("/api/list", StatusCode::OK, "c,c++\npython, \n")
}

#[test]
fn test_list_parses_delimited_options() {
    let (provider, requests) = build_provider(listing());

    let options = provider.list().unwrap();

    assert_eq!(options, strings(&["c", "c++", "python"]));
    assert_eq!(*requests.borrow(), vec![format!("{BASE_URL}/list")]);
}

#[test]
fn test_list_reports_http_status() {
    let fetcher = FakeFetcher::default().respond(
        "/api/list",
        StatusCode::GATEWAY_TIMEOUT,
        "Unavailable",
    );
    let (provider, _) = build_provider(fetcher);

    let err = provider.list().unwrap_err();

    assert!(matches!(err, Error::RetrievalError(_)));
    assert!(err.to_string().contains("504"));
}

#[test]
fn test_list_transport_failure() {
    let (provider, _) = build_provider(FakeFetcher::default());

    assert!(matches!(provider.list(), Err(Error::RetrievalError(_))));
}

#[test]
fn test_generate_strips_banners() {
    let body = generate_response(&[("c", "### C ###\n*.o"), ("c++", "### C++ ###\n*.obj")]);
    let fetcher = listing().respond("/api/c,c++", StatusCode::OK, &body);
    let (provider, requests) = build_provider(fetcher);

    let content = provider.generate(&strings(&["c", "c++"])).unwrap();

    assert_eq!(content, "### C ###\n*.o\n### C++ ###\n*.obj");
    assert_eq!(requests.borrow().last().unwrap(), &format!("{BASE_URL}/c,c++"));
}

#[test]
fn test_generate_rejects_invalid_option() {
    let (provider, requests) = build_provider(listing());

    let err = provider.generate(&strings(&["rust"])).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(requests.borrow().len(), 1);
}

#[test]
fn test_generate_requires_options() {
    let (provider, _) = build_provider(listing());

    assert!(provider.generate(&[]).unwrap_err().is_validation());
}

#[test]
fn test_generate_reports_http_status() {
    let fetcher = listing().respond("/api/c", StatusCode::INTERNAL_SERVER_ERROR, "boom");
    let (provider, _) = build_provider(fetcher);

    let err = provider.generate(&strings(&["c"])).unwrap_err();

    assert!(matches!(err, Error::RetrievalError(_)));
    assert!(err.to_string().contains("500"));
}

#[test]
fn test_source_generates_each_option() {
    let fetcher = listing()
        .respond("/api/c", StatusCode::OK, &generate_response(&[("c", "### C ###")]))
        .respond("/api/c++", StatusCode::OK, &generate_response(&[("c++", "### C++ ###")]))
        .respond("/api/python", StatusCode::OK, &generate_response(&[("python", "### Python ###")]));
    let (provider, _) = build_provider(fetcher);

    let mapping = provider.source().unwrap();

    assert_eq!(mapping.len(), 3);
    assert_eq!(mapping["c"], "### C ###");
    assert_eq!(mapping["c++"], "### C++ ###");
    assert_eq!(mapping["python"], "### Python ###");
}

#[test]
fn test_source_fails_when_any_option_fails() {
    let fetcher = listing()
        .respond("/api/c", StatusCode::OK, &generate_response(&[("c", "### C ###")]))
        .respond("/api/c++", StatusCode::NOT_FOUND, "missing");
    let (provider, _) = build_provider(fetcher);

    let err = provider.source().unwrap_err();

    assert!(matches!(err, Error::RetrievalError(_)));
    assert!(err.to_string().contains("c++"));
}

#[test]
fn test_invalid_base_url() {
    let result = HttpProvider::new("not a url", Box::new(FakeFetcher::default()));

    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_trailing_slash_in_base_url() {
    let fetcher = FakeFetcher::default().respond("/api/list", StatusCode::OK, "c");
    let requests = Rc::clone(&fetcher.requests);
    let provider = HttpProvider::new("http://localhost:8080/api/", Box::new(fetcher)).unwrap();

    assert_eq!(provider.list().unwrap(), strings(&["c"]));
    assert_eq!(*requests.borrow(), vec![format!("{BASE_URL}/list")]);
}

#[test]
fn test_capabilities() {
    let (provider, _) = build_provider(listing());

    assert!(provider.as_source().is_some());
    assert!(provider.as_cache().is_none());
    assert!(provider.as_mirror().is_none());
}
