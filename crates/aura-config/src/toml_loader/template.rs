//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Aura Configuration
# Only override what you want to change -- missing fields use defaults.

[limits]
# free_daily_limit = 5     # questions per UTC calendar day, free tier

[context]
# max_context_tokens = 4096
# reply_reserve_tokens = 100

[retry]
# max_retries = 2          # retries after the first attempt
# base_delay_ms = 500
# max_delay_ms = 2000
# request_timeout_ms = 8000

[models.free]
# model = "gpt-4o-mini"
# max_response_tokens = 256
# temperature = 0.7        # 0.0-2.0
# top_p = 1.0              # (0.0, 1.0]

[models.premium]
# model = "gpt-4o"
# max_response_tokens = 512
# temperature = 0.7
# top_p = 1.0

[provider]
# api_base = "https://api.openai.com/v1"
# api_key = ""             # usually resolved from OPENAI_API_KEY instead

[session]
# max_turn_messages = 20
# idle_end_minutes = 30
# hard_expiry_minutes = 120
"##
    .to_string()
}
