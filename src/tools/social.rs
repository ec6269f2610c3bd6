use async_trait::async_trait;
use serde_json::{json, Value};

use super::{object_schema, ToolDescriptor, ToolKind, ToolSet};
use crate::clients::SocialClient;
use crate::error::DispatchError;
use crate::handlers::social;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialTool {
    Tweet,
    GetTimeline,
    GetMyTweets,
}

impl ToolKind for SocialTool {
    const ALL: &'static [Self] = &[Self::Tweet, Self::GetTimeline, Self::GetMyTweets];

    fn name(self) -> &'static str {
        match self {
            Self::Tweet => "tweet",
            Self::GetTimeline => "get_timeline",
            Self::GetMyTweets => "get_my_tweets",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Tweet => {
                "Post a tweet to Twitter/X. Use reply_to to reply to a specific tweet (thread)."
            }
            Self::GetTimeline => "Get your home timeline",
            Self::GetMyTweets => "Get your own tweets",
        }
    }

    fn input_schema(self) -> Value {
        match self {
            Self::Tweet => object_schema(
                json!({
                    "text": {
                        "type": "string",
                        "description": "Tweet content (max 280 chars)"
                    },
                    "reply_to": {
                        "type": "string",
                        "description": "Tweet ID to reply to (for threads)"
                    }
                }),
                &["text"],
            ),
            Self::GetTimeline | Self::GetMyTweets => object_schema(
                json!({
                    "max_results": {
                        "type": "integer",
                        "description": "Max tweets to return (default 10)",
                        "minimum": 1,
                        "maximum": 100
                    }
                }),
                &[],
            ),
        }
    }
}

/// The X registry: `tweet`, `get_timeline`, `get_my_tweets`.
pub struct SocialTools<C> {
    client: C,
    descriptors: Vec<ToolDescriptor>,
}

impl<C: SocialClient> SocialTools<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            descriptors: SocialTool::descriptors(),
        }
    }
}

#[async_trait]
impl<C: SocialClient> ToolSet for SocialTools<C> {
    fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    async fn call(&self, name: &str, arguments: Value) -> Result<Value, DispatchError> {
        let tool = SocialTool::from_name(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        let result = match tool {
            SocialTool::Tweet => social::tweet(&self.client, arguments).await,
            SocialTool::GetTimeline => social::get_timeline(&self.client, arguments).await,
            SocialTool::GetMyTweets => social::get_my_tweets(&self.client, arguments).await,
        };
        Ok(result?)
    }
}
