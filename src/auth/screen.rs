//! Three-state display selector driven by gateway outcomes.

// self
use crate::_prelude::*;

/// Screen the client should currently show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Screen {
	/// Login form.
	#[default]
	Unauthenticated,
	/// Second-factor PIN form.
	PendingSecondFactor,
	/// Dashboard.
	Authenticated,
}
impl Screen {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Screen::Unauthenticated => "unauthenticated",
			Screen::PendingSecondFactor => "pending_second_factor",
			Screen::Authenticated => "authenticated",
		}
	}
}
impl Display for Screen {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Raised when an event does not apply to the current screen.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Event `{event}` is not valid on the {from} screen.")]
pub struct TransitionError {
	/// Screen the selector was on.
	pub from: Screen,
	/// Rejected event label.
	pub event: &'static str,
}

/// Finite-state display selector: login → second factor → dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScreenSelector {
	screen: Screen,
	email: Option<String>,
}
impl ScreenSelector {
	/// Current screen.
	pub fn screen(&self) -> Screen {
		self.screen
	}

	/// E-mail of the user going through the flow, if any.
	pub fn email(&self) -> Option<&str> {
		self.email.as_deref()
	}

	/// Password login succeeded; ask for the second factor.
	pub fn credentials_accepted(
		&mut self,
		email: impl Into<String>,
	) -> Result<Screen, TransitionError> {
		self.expect(Screen::Unauthenticated, "credentials_accepted")?;
		self.email = Some(email.into());

		Ok(self.move_to(Screen::PendingSecondFactor))
	}

	/// Second factor verified; show the dashboard.
	pub fn second_factor_verified(&mut self) -> Result<Screen, TransitionError> {
		self.expect(Screen::PendingSecondFactor, "second_factor_verified")?;

		Ok(self.move_to(Screen::Authenticated))
	}

	/// User cancelled (or was locked out of) the second-factor step.
	pub fn cancel(&mut self) -> Result<Screen, TransitionError> {
		self.expect(Screen::PendingSecondFactor, "cancel")?;
		self.email = None;

		Ok(self.move_to(Screen::Unauthenticated))
	}

	/// Explicit logout from any screen.
	pub fn sign_out(&mut self) -> Screen {
		self.email = None;

		self.move_to(Screen::Unauthenticated)
	}

	/// Reacts to the gateway session disappearing (expiry or teardown).
	pub fn sync(&mut self, is_authenticated: bool) -> Screen {
		if self.screen == Screen::Authenticated && !is_authenticated {
			return self.sign_out();
		}

		self.screen
	}

	fn expect(&self, from: Screen, event: &'static str) -> Result<(), TransitionError> {
		if self.screen == from { Ok(()) } else { Err(TransitionError { from: self.screen, event }) }
	}

	fn move_to(&mut self, screen: Screen) -> Screen {
		self.screen = screen;

		screen
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn happy_path_reaches_dashboard() {
		let mut selector = ScreenSelector::default();

		assert_eq!(selector.screen(), Screen::Unauthenticated);
		assert_eq!(
			selector.credentials_accepted("alice@securebank.com"),
			Ok(Screen::PendingSecondFactor)
		);
		assert_eq!(selector.email(), Some("alice@securebank.com"));
		assert_eq!(selector.second_factor_verified(), Ok(Screen::Authenticated));
		assert_eq!(selector.sync(true), Screen::Authenticated);
		assert_eq!(selector.sync(false), Screen::Unauthenticated);
		assert_eq!(selector.email(), None);
	}

	#[test]
	fn invalid_events_are_rejected() {
		let mut selector = ScreenSelector::default();
		let err = selector.second_factor_verified().expect_err("Cannot skip the login step.");

		assert_eq!(err.from, Screen::Unauthenticated);
		assert_eq!(err.event, "second_factor_verified");

		selector.credentials_accepted("bob@securebank.com").expect("Login should move on.");

		assert_eq!(selector.cancel(), Ok(Screen::Unauthenticated));
		assert!(selector.cancel().is_err());
	}

	#[test]
	fn sync_leaves_login_steps_alone() {
		let mut selector = ScreenSelector::default();

		selector.credentials_accepted("carol@securebank.com").expect("Login should move on.");

		assert_eq!(selector.sync(false), Screen::PendingSecondFactor);
	}
}
