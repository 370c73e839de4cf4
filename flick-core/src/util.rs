use std::{mem, time::Duration};

use num_traits::{One, WrappingAdd};

pub const NET_CONNECT_TIMEOUT: Duration = Duration::from_millis(8 * 1000);

pub const NET_IO_TIMEOUT: Duration = Duration::from_millis(16 * 1000);

pub fn default_ureq_agent_builder(
    proxy_url: Option<&str>,
) -> ureq::config::ConfigBuilder<ureq::typestate::AgentScope> {
    let mut agent = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(30)))
        .timeout_connect(Some(NET_CONNECT_TIMEOUT))
        .timeout_recv_response(Some(NET_IO_TIMEOUT))
        .timeout_send_request(Some(NET_IO_TIMEOUT))
        .http_status_as_error(false);

    if let Some(proxy_url) = proxy_url {
        let proxy = ureq::Proxy::new(proxy_url).ok();
        agent = agent.proxy(proxy);
    }

    agent
}

/// Monotonic counter handing out generation numbers.  Wraps around instead of
/// overflowing.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Sequence<T>(T);

impl<T: One + WrappingAdd> Sequence<T> {
    pub fn new(value: T) -> Self {
        Sequence(value)
    }

    pub fn advance(&mut self) -> T {
        let next = self.0.wrapping_add(&T::one());
        mem::replace(&mut self.0, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_hands_out_consecutive_values() {
        let mut seq = Sequence::new(7u64);
        assert_eq!(seq.advance(), 7);
        assert_eq!(seq.advance(), 8);
        assert_eq!(seq.advance(), 9);
    }

    #[test]
    fn sequence_wraps_around() {
        let mut seq = Sequence::new(u8::MAX);
        assert_eq!(seq.advance(), u8::MAX);
        assert_eq!(seq.advance(), 0);
    }
}
