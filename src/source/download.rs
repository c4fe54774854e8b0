use std::{fs, thread, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use super::region::RegionSource;

/// Retrieves the raw, still encoded payload of a region.
pub trait PayloadFetcher {
    fn fetch(&self, source: &RegionSource) -> anyhow::Result<Vec<u8>>;
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            retry_delay_secs: 2,
            user_agent: "traffic-incidents".to_string(),
        }
    }
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn download(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self.try_download(url) {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = Duration::from_secs(
                        self.config.retry_delay_secs.saturating_mul(attempt as u64),
                    );
                    log::warn!(
                        "Fetching {} failed ({}), retry {}/{} in {:?}",
                        url,
                        err,
                        attempt,
                        self.config.max_retries,
                        delay
                    );
                    thread::sleep(delay);
                }
                Err(err) => return Err(anyhow!("Could not fetch {}: {}", url, err)),
            }
        }
    }

    fn try_download(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(DownloadError::Request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status));
        }
        let body = response.bytes().map_err(DownloadError::Request)?;
        Ok(body.to_vec())
    }
}

impl PayloadFetcher for HttpFetcher {
    fn fetch(&self, source: &RegionSource) -> anyhow::Result<Vec<u8>> {
        match source {
            RegionSource::Url { url } => self.download(url),
            RegionSource::File { filepath } => fs::read(filepath)
                .with_context(|| format!("Reading payload from {:?}", filepath)),
        }
    }
}

#[derive(Debug)]
enum DownloadError {
    Request(reqwest::Error),
    Status(reqwest::StatusCode),
}

impl DownloadError {
    fn is_transient(&self) -> bool {
        match self {
            DownloadError::Request(err) => err.is_timeout() || err.is_connect(),
            DownloadError::Status(status) => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
        }
    }
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadError::Request(err) => write!(f, "{}", err),
            DownloadError::Status(status) => write!(f, "HTTP status {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread,
    };

    use rstest::rstest;
    use testdir::testdir;

    use crate::source::region::RegionSource;

    use super::{FetchConfig, HttpFetcher, PayloadFetcher};

    /// Answers one request per status, in order, then stops accepting.
    fn serve_statuses(statuses: Vec<u16>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        thread::spawn(move || {
            for status in statuses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                    line.clear();
                }
                let body = format!("body {}", status);
                write!(
                    stream,
                    "HTTP/1.1 {} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                )
                .unwrap();
            }
        });
        format!("http://{}/content.xml", address)
    }

    fn fetcher(max_retries: u32) -> HttpFetcher {
        HttpFetcher::new(FetchConfig {
            timeout_secs: 5,
            max_retries,
            retry_delay_secs: 0,
            ..FetchConfig::default()
        })
        .unwrap()
    }

    #[rstest]
    #[case(vec![200], 0, Some("body 200"))]
    #[case(vec![503, 200], 2, Some("body 200"))]
    #[case(vec![429, 500, 200], 2, Some("body 200"))]
    // The trailing 200 is only reached if the policy retries more than it should.
    #[case(vec![404, 200], 2, None)]
    #[case(vec![503, 503, 503, 200], 2, None)]
    #[case(vec![503, 200], 0, None)]
    fn test_download_retry_policy(
        #[case] statuses: Vec<u16>,
        #[case] max_retries: u32,
        #[case] expected_body: Option<&str>,
    ) {
        let url = serve_statuses(statuses);
        let result = fetcher(max_retries).fetch(&RegionSource::Url { url });
        match expected_body {
            Some(body) => assert_eq!(body.as_bytes(), result.unwrap().as_slice()),
            None => assert!(result.is_err()),
        }
    }

    #[rstest]
    fn test_download_error_names_the_status() {
        let url = serve_statuses(vec![404]);
        let err = fetcher(2)
            .fetch(&RegionSource::Url { url })
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[rstest]
    fn test_fetch_file_source_keeps_raw_bytes() {
        let test_dir = testdir!();
        let filepath = test_dir.join("payload.xml");
        let contents = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><road>Catalu\xF1a</road>";
        fs::write(&filepath, contents).unwrap();

        let payload = fetcher(0).fetch(&RegionSource::File { filepath }).unwrap();
        assert_eq!(contents.to_vec(), payload);
    }

    #[rstest]
    fn test_fetch_missing_file_fails() {
        let test_dir = testdir!();
        let source = RegionSource::File {
            filepath: test_dir.join("missing.xml"),
        };
        assert!(fetcher(0).fetch(&source).is_err());
    }
}
