use lazy_static::lazy_static;
use regex::Regex;

/// Token announcement extracted from a channel message
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSignal {
    pub address: String,
    pub name: String,
    pub mcap: String,
    pub mentions: u32,
    pub time_since_open: String,
}

lazy_static! {
    static ref ADDRESS_RE: Regex = Regex::new(r"\b[a-zA-Z0-9]{32,44}\b").unwrap();
    static ref MCAP_RE: Regex = Regex::new(r"市值[:：]\s*\$([0-9.]+[KMB]?)").unwrap();
    static ref COMMUNITY_RE: Regex = Regex::new(r"已在\s*(\d+)\s*个社区").unwrap();
    static ref TIME_RE: Regex = Regex::new(r"开盘后\s*(.*?)\s*在").unwrap();
    static ref NAME_RE: Regex = Regex::new(r"\$([a-zA-Z0-9]+)").unwrap();
}

/// Extract a token signal from a message; messages without a contract address yield `None`
pub fn extract_signal(text: &str) -> Option<ChannelSignal> {
    let address = ADDRESS_RE.find(text)?.as_str().to_string();

    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
    };

    Some(ChannelSignal {
        address,
        name: capture(&NAME_RE).unwrap_or_else(|| "Unknown".to_string()),
        mcap: capture(&MCAP_RE).unwrap_or_else(|| "N/A".to_string()),
        mentions: capture(&COMMUNITY_RE)
            .and_then(|count| count.parse().ok())
            .unwrap_or(1),
        time_since_open: capture(&TIME_RE).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = "🔥 $BONK 新币推荐\n\
        CA: 7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr\n\
        市值: $12.3K\n\
        已在 5 个社区推广\n\
        开盘后 3分钟 在群内首次出现";

    #[test]
    fn test_extract_full_message() {
        let signal = extract_signal(MESSAGE).unwrap();

        assert_eq!(signal.address, "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr");
        assert_eq!(signal.name, "BONK");
        assert_eq!(signal.mcap, "12.3K");
        assert_eq!(signal.mentions, 5);
        assert_eq!(signal.time_since_open, "3分钟");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let signal = extract_signal("look 0x6982508145454Ce325dDbE47a25d4ec3d2311933").unwrap();

        assert_eq!(signal.address, "0x6982508145454Ce325dDbE47a25d4ec3d2311933");
        assert_eq!(signal.name, "Unknown");
        assert_eq!(signal.mcap, "N/A");
        assert_eq!(signal.mentions, 1);
        assert_eq!(signal.time_since_open, "");
    }

    #[test]
    fn test_message_without_address() {
        assert!(extract_signal("gm, $PEPE to the moon").is_none());
    }
}
