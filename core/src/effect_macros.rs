//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block body
///
/// The body must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use venueflow_core::async_effect;
///
/// async_effect! {
///     let bookings = gateway.fetch_bookings().await;
///     Some(DashboardAction::BookingsLoaded { bookings })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Future` that immediately feeds `action` back to the store
///
/// Used when a command is answered without any I/O, e.g. a rejected command
/// whose outcome still has to reach the caller awaiting it.
///
/// # Example
///
/// ```rust,ignore
/// use venueflow_core::feedback;
///
/// feedback!(DashboardAction::OperationFailed { request_id, error })
/// ```
#[macro_export]
macro_rules! feedback {
    ($action:expr) => {{
        let action = $action;
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { ::std::option::Option::Some(action) })
        )
    }};
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
        Rejected,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_feedback_macro_yields_action() {
        let effect = feedback!(TestAction::Rejected);

        let Effect::Future(fut) = effect else {
            unreachable!("feedback! always builds a future effect");
        };
        assert_eq!(tokio_test::block_on(fut), Some(TestAction::Rejected));
    }
}
