use {
    crate::traits::Faucet,
    alloy::primitives::Address,
    reqwest::{Client, StatusCode},
    serde::Serialize,
    url::Url,
};

#[derive(Debug, thiserror::Error)]
pub enum FaucetError {
    #[error("faucet responded with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct ClaimRequest {
    #[serde(serialize_with = "checksummed")]
    address: Address,
}

fn checksummed<S: serde::Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

/// Claims tokens from the Maitrix faucets, which only need the receiving
/// address in a JSON body.
pub struct HttpFaucet {
    client: Client,
}

impl HttpFaucet {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Faucet for HttpFaucet {
    async fn claim(&self, url: &Url, address: Address) -> Result<(), FaucetError> {
        let response = self
            .client
            .post(url.clone())
            .json(&ClaimRequest { address })
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }
        // The body usually explains why (cooldown, captcha, ...).
        let body = response.text().await.unwrap_or_default();
        Err(FaucetError::Rejected { status, body })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::address,
        tokio::{
            io::{AsyncReadExt, AsyncWriteExt},
            net::TcpListener,
            sync::oneshot,
        },
    };

    const WALLET: Address = address!("0xFF27D611ab162d7827bbbA59F140C1E7aE56e95C");

    /// Answers a single HTTP request with `status` and `body` and hands out
    /// the raw request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/faucet", listener.local_addr().unwrap())).unwrap();
        let (sender, receiver) = oneshot::channel();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0; 1024];
            while !request_complete(&request) {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = sender.send(String::from_utf8_lossy(&request).into_owned());
        });
        (url, receiver)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    fn faucet() -> HttpFaucet {
        HttpFaucet::new(Client::new())
    }

    #[tokio::test]
    async fn ok_response_is_a_claim() {
        let (url, request) = serve_once("200 OK", "queued").await;
        faucet().claim(&url, WALLET).await.unwrap();

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /faucet "));
        assert!(request.ends_with(r#"{"address":"0xFF27D611ab162d7827bbbA59F140C1E7aE56e95C"}"#));
    }

    #[tokio::test]
    async fn server_error_is_rejected_with_body() {
        let (url, _request) = serve_once("500 Internal Server Error", "try again later").await;
        let err = faucet().claim(&url, WALLET).await.unwrap_err();
        match err {
            FaucetError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "try again later");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn only_200_counts_as_success() {
        let (url, _request) = serve_once("201 Created", "").await;
        let err = faucet().claim(&url, WALLET).await.unwrap_err();
        assert!(matches!(
            err,
            FaucetError::Rejected { status: StatusCode::CREATED, .. }
        ));
    }

    #[tokio::test]
    async fn unreachable_faucet_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/faucet", listener.local_addr().unwrap())).unwrap();
        drop(listener);

        let err = faucet().claim(&url, WALLET).await.unwrap_err();
        assert!(matches!(err, FaucetError::Request(_)));
    }

    #[test]
    fn claim_body_is_checksummed_address() {
        let body = serde_json::to_value(ClaimRequest { address: WALLET }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "address": "0xFF27D611ab162d7827bbbA59F140C1E7aE56e95C" })
        );
    }

    #[test]
    fn rejection_message_contains_status_and_body() {
        let err = FaucetError::Rejected {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "come back tomorrow".into(),
        };
        assert_eq!(
            err.to_string(),
            "faucet responded with 429 Too Many Requests: come back tomorrow"
        );
    }
}
