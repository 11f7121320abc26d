use crate::model::ChannelRole;

/// Resolves a chat id to the role of the watched channel it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDirectory {
    target: i64,
    pips: i64,
    forex: i64,
    crypto: i64,
}

impl ChannelDirectory {
    pub fn new(target: i64, pips: i64, forex: i64, crypto: i64) -> Self {
        Self {
            target,
            pips,
            forex,
            crypto,
        }
    }

    /// Channel confirmations and notices are posted to.
    pub fn target(&self) -> i64 {
        self.target
    }

    /// The target channel wins when one id is configured for several roles, since it
    /// already accepts every grammar.
    pub fn resolve(&self, channel_id: i64) -> Option<ChannelRole> {
        if channel_id == self.target {
            Some(ChannelRole::Target)
        } else if channel_id == self.pips {
            Some(ChannelRole::Pips)
        } else if channel_id == self.forex {
            Some(ChannelRole::Forex)
        } else if channel_id == self.crypto {
            Some(ChannelRole::Crypto)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_each_watched_channel() {
        let dir = ChannelDirectory::new(-1, -2, -3, -4);
        assert_eq!(dir.resolve(-1), Some(ChannelRole::Target));
        assert_eq!(dir.resolve(-2), Some(ChannelRole::Pips));
        assert_eq!(dir.resolve(-3), Some(ChannelRole::Forex));
        assert_eq!(dir.resolve(-4), Some(ChannelRole::Crypto));
        assert_eq!(dir.resolve(-5), None);
    }

    #[test]
    fn target_takes_precedence_on_shared_id() {
        let dir = ChannelDirectory::new(-1, -1, -3, -4);
        assert_eq!(dir.resolve(-1), Some(ChannelRole::Target));
    }
}
