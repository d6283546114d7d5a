/// What the control endpoint does with a duty value outside the channel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyPolicy {
    /// Hand the parsed value to the channels as is.
    PassThrough,
    /// Answer `400 Bad Request` and leave the channels untouched.
    Reject,
}

/// HTTP surface settings shared by the router and its handlers.
#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    /// Exact path of the control endpoint.
    pub control_path: &'static str,
    /// Name of the request argument carrying the duty value.
    pub control_arg: &'static str,
    /// Document served for paths ending with `/`.
    pub default_document: &'static str,
    /// Page linked from the control confirmation.
    pub back_link: &'static str,
    pub duty_policy: DutyPolicy,
}

impl HttpSettings {
    pub const DEFAULT: HttpSettings = HttpSettings {
        control_path: "/LED-Control",
        control_arg: "ledPwm",
        default_document: "index.html",
        back_link: "/LED.html",
        duty_policy: DutyPolicy::PassThrough,
    };

    /// Set the duty policy.
    #[must_use]
    pub const fn with_duty_policy(mut self, policy: DutyPolicy) -> Self {
        self.duty_policy = policy;
        self
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
