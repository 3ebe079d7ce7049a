//! Decodes receipt logs into bridge events.
//!
//! Matching is by event signature hash (`topics[0]`) against the binding's
//! precomputed Deposit/Unwrap topics, never by speculative field-by-field
//! parsing: a log that matches neither signature is routine and decodes to
//! [`DecodedEvent::Unrecognized`] without error. Only a log that matches a
//! known signature but carries a malformed topic/data layout is a
//! [`DecodeError`], and that is scoped to the single log.

use alloy::json_abi::Event;
use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Log;

use crate::error::DecodeError;
use crate::registry::ContractBinding;
use crate::types::DecodedEvent;

/// Decode one receipt log against a contract binding.
pub fn decode(log: &Log, binding: &ContractBinding) -> Result<DecodedEvent, DecodeError> {
    let topics = log.topics();
    let Some(&topic0) = topics.first() else {
        return Ok(DecodedEvent::Unrecognized);
    };

    let data = log.data().data.as_ref();
    if topic0 == binding.deposit_topic {
        let (token, recipient, amount) =
            decode_transfer_event("Deposit", &binding.deposit_event, topics, data)?;
        Ok(DecodedEvent::Deposit {
            token,
            recipient,
            amount,
        })
    } else if topic0 == binding.unwrap_topic {
        let (token, recipient, amount) =
            decode_transfer_event("Unwrap", &binding.unwrap_event, topics, data)?;
        Ok(DecodedEvent::Unwrap {
            token,
            recipient,
            amount,
        })
    } else {
        Ok(DecodedEvent::Unrecognized)
    }
}

/// Walk the ABI event definition, consuming one topic per indexed parameter
/// and one 32-byte data word per non-indexed parameter, and pick out the
/// token/recipient/amount values by parameter name.
///
/// Both bridge events carry only word-sized parameters (addresses and a
/// uint256), so no dynamic-type offset handling is needed.
fn decode_transfer_event(
    kind: &'static str,
    event: &Event,
    topics: &[B256],
    data: &[u8],
) -> Result<(Address, Address, U256), DecodeError> {
    let expected_topics = 1 + event.inputs.iter().filter(|input| input.indexed).count();
    if topics.len() < expected_topics {
        return Err(DecodeError::TopicCount {
            event: kind,
            expected: expected_topics,
            found: topics.len(),
        });
    }

    let mut topic_iter = topics.iter().skip(1);
    let mut data_offset = 0usize;
    let mut token = None;
    let mut recipient = None;
    let mut amount = None;

    for input in &event.inputs {
        let word: [u8; 32] = if input.indexed {
            // Bounds checked against expected_topics above.
            match topic_iter.next() {
                Some(topic) => topic.0,
                None => {
                    return Err(DecodeError::TopicCount {
                        event: kind,
                        expected: expected_topics,
                        found: topics.len(),
                    })
                }
            }
        } else {
            let end = data_offset + 32;
            if data.len() < end {
                return Err(DecodeError::DataTooShort {
                    event: kind,
                    len: data.len(),
                });
            }
            let mut word = [0u8; 32];
            word.copy_from_slice(&data[data_offset..end]);
            data_offset = end;
            word
        };

        match input.name.as_str() {
            "token" => token = Some(Address::from_slice(&word[12..])),
            "recipient" => recipient = Some(Address::from_slice(&word[12..])),
            "amount" => amount = Some(U256::from_be_bytes(word)),
            _ => {}
        }
    }

    let token = token.ok_or(DecodeError::MissingParam {
        event: kind,
        param: "token",
    })?;
    let recipient = recipient.ok_or(DecodeError::MissingParam {
        event: kind,
        param: "recipient",
    })?;
    let amount = amount.ok_or(DecodeError::MissingParam {
        event: kind,
        param: "amount",
    })?;
    Ok((token, recipient, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        deposit_log, source_binding, unrecognized_log, unwrap_log, TOKEN, USER,
    };
    use alloy::primitives::keccak256;
    use alloy::rpc::types::Log;

    #[test]
    fn test_decode_deposit() {
        let binding = source_binding();
        let log = deposit_log(TOKEN, USER, U256::from(1000u64));
        let event = decode(&log, &binding).unwrap();
        assert_eq!(
            event,
            DecodedEvent::Deposit {
                token: TOKEN,
                recipient: USER,
                amount: U256::from(1000u64),
            }
        );
    }

    #[test]
    fn test_decode_unwrap() {
        let binding = source_binding();
        let log = unwrap_log(TOKEN, USER, U256::from(42u64));
        let event = decode(&log, &binding).unwrap();
        assert_eq!(
            event,
            DecodedEvent::Unwrap {
                token: TOKEN,
                recipient: USER,
                amount: U256::from(42u64),
            }
        );
    }

    #[test]
    fn test_unrelated_log_is_unrecognized() {
        let binding = source_binding();
        let log = unrecognized_log();
        assert_eq!(decode(&log, &binding).unwrap(), DecodedEvent::Unrecognized);
    }

    #[test]
    fn test_log_without_topics_is_unrecognized() {
        let binding = source_binding();
        let log = Log::default();
        assert_eq!(decode(&log, &binding).unwrap(), DecodedEvent::Unrecognized);
    }

    #[test]
    fn test_similar_but_different_signature_is_unrecognized() {
        let binding = source_binding();
        let mut log = deposit_log(TOKEN, USER, U256::from(1u64));
        // Same shape, different event name, so a different topic0.
        log.inner.data = alloy::primitives::LogData::new_unchecked(
            {
                let mut topics = log.topics().to_vec();
                topics[0] = keccak256(b"Deposited(address,address,uint256)");
                topics
            },
            log.data().data.clone(),
        );
        assert_eq!(decode(&log, &binding).unwrap(), DecodedEvent::Unrecognized);
    }

    #[test]
    fn test_matching_log_with_missing_topic_fails() {
        let binding = source_binding();
        let log = deposit_log(TOKEN, USER, U256::from(1u64));
        let truncated = Log {
            inner: alloy::primitives::Log {
                address: log.inner.address,
                data: alloy::primitives::LogData::new_unchecked(
                    log.topics()[..2].to_vec(),
                    log.data().data.clone(),
                ),
            },
            ..Default::default()
        };
        assert!(matches!(
            decode(&truncated, &binding),
            Err(DecodeError::TopicCount { event: "Deposit", .. })
        ));
    }

    #[test]
    fn test_matching_log_with_short_data_fails() {
        let binding = source_binding();
        let log = deposit_log(TOKEN, USER, U256::from(1u64));
        let truncated = Log {
            inner: alloy::primitives::Log {
                address: log.inner.address,
                data: alloy::primitives::LogData::new_unchecked(
                    log.topics().to_vec(),
                    alloy::primitives::Bytes::from(vec![0u8; 16]),
                ),
            },
            ..Default::default()
        };
        assert!(matches!(
            decode(&truncated, &binding),
            Err(DecodeError::DataTooShort { event: "Deposit", len: 16 })
        ));
    }
}
