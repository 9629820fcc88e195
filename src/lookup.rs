use dns_codec::RESPONSE_CAPACITY;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time;
use tracing::info;

type Result<T> = anyhow::Result<T>;

/// One query, one reply, against a single server.
#[derive(Debug)]
pub(crate) struct Lookup {
    server: SocketAddr,
    timeout: Option<Duration>,
}

impl Lookup {
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            timeout: None,
        }
    }

    /// Bounds the wait for the reply. Without a timeout the exchange waits
    /// for as long as it takes.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `query` and returns the first datagram that comes back, cut to
    /// [`RESPONSE_CAPACITY`] bytes.
    pub async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>> {
        let local_addr: SocketAddr = "0.0.0.0:0".parse()?;
        let socket = UdpSocket::bind(local_addr).await?;
        socket.connect(self.server).await?;

        info!("Sending {} bytes to {}", query.len(), self.server);
        socket.send(query).await?;

        let mut buf = vec![0u8; RESPONSE_CAPACITY];
        let len = match self.timeout {
            Some(timeout) => time::timeout(timeout, socket.recv(&mut buf))
                .await
                .map_err(|_| {
                    anyhow::anyhow!("no reply from {} within {:?}", self.server, timeout)
                })??,
            None => socket.recv(&mut buf).await?,
        };
        buf.truncate(len);

        info!("Got back {} bytes from {}", len, self.server);
        Ok(buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    async fn fake_server(reply: Option<Vec<u8>>) -> SocketAddr {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (_, peer) = socket.recv_from(&mut buf).await.unwrap();
            match reply {
                Some(reply) => {
                    socket.send_to(&reply, peer).await.unwrap();
                }
                // Hold the socket open without answering.
                None => time::sleep(Duration::from_secs(5)).await,
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_exchange() {
        let addr = fake_server(Some(vec![1, 2, 3])).await;
        let reply = Lookup::new(addr).exchange(&[9, 9]).await.unwrap();
        assert_eq!(reply, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_exchange_truncates_large_replies() {
        let addr = fake_server(Some(vec![7; RESPONSE_CAPACITY + 100])).await;
        let reply = Lookup::new(addr)
            .timeout(Some(Duration::from_secs(5)))
            .exchange(&[0])
            .await
            .unwrap();
        assert_eq!(reply.len(), RESPONSE_CAPACITY);
    }

    #[tokio::test]
    async fn test_exchange_times_out() {
        let addr = fake_server(None).await;
        let err = Lookup::new(addr)
            .timeout(Some(Duration::from_millis(50)))
            .exchange(&[0])
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("no reply from"));
    }
}
