//! Demo second-factor PIN challenge issued between password login and the dashboard.
//!
//! The challenge owns a 6-digit numeric code that is delivered out of band (the demo
//! shows it on screen) and kept only as a SHA-256 digest. Three wrong PINs lock the
//! challenge; a new code can be requested once the resend cooldown has elapsed.

// crates.io
use rand::Rng;
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Result of a PIN verification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
	/// PIN matched; the caller may proceed to the dashboard.
	Verified,
	/// No digits were entered; no attempt was consumed.
	Missing,
	/// PIN did not match.
	Incorrect {
		/// Attempts remaining before lockout.
		attempts_left: u8,
	},
	/// No attempts remain; the caller should return to the login screen.
	LockedOut,
}

/// Errors raised when a new code cannot be issued.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ResendError {
	/// Resend requested before the cooldown elapsed.
	#[error("A new code can be requested in {} seconds.", .remaining.whole_seconds())]
	CoolingDown {
		/// Time left until a resend is allowed.
		remaining: Duration,
	},
	/// The challenge is locked.
	#[error("No attempts left.")]
	LockedOut,
}

/// Pending second-factor verification for one login.
#[derive(Clone)]
pub struct SecondFactorChallenge {
	email: String,
	digest: [u8; 32],
	attempts_left: u8,
	resend_available_at: OffsetDateTime,
}
impl SecondFactorChallenge {
	/// Number of digits in a code.
	pub const CODE_LEN: usize = 6;
	/// Wrong PINs tolerated before lockout.
	pub const MAX_ATTEMPTS: u8 = 3;
	/// Minimum delay between two issued codes.
	pub const RESEND_COOLDOWN: Duration = Duration::seconds(30);

	/// Issues a challenge for `email` and returns it with the code to deliver.
	pub fn issue(email: impl Into<String>, now: OffsetDateTime) -> (Self, TokenSecret) {
		Self::issue_with_rng(email, now, &mut rand::rng())
	}

	/// Same as [`Self::issue`] with a caller-provided RNG.
	pub fn issue_with_rng<R>(
		email: impl Into<String>,
		now: OffsetDateTime,
		rng: &mut R,
	) -> (Self, TokenSecret)
	where
		R: Rng,
	{
		let code = generate_code(rng);
		let challenge = Self {
			email: email.into(),
			digest: digest(code.expose()),
			attempts_left: Self::MAX_ATTEMPTS,
			resend_available_at: now + Self::RESEND_COOLDOWN,
		};

		(challenge, code)
	}

	/// E-mail address the code was sent to.
	pub fn email(&self) -> &str {
		&self.email
	}

	/// Masked e-mail suitable for display (`al••••@example.com`).
	pub fn masked_email(&self) -> String {
		mask_email(&self.email)
	}

	/// Attempts remaining before lockout.
	pub fn attempts_left(&self) -> u8 {
		self.attempts_left
	}

	/// Time left before [`Self::resend`] succeeds; zero once available.
	pub fn resend_cooldown(&self, now: OffsetDateTime) -> Duration {
		let remaining = self.resend_available_at - now;

		if remaining.is_positive() { remaining } else { Duration::ZERO }
	}

	/// Checks `pin`, ignoring any non-digit characters.
	pub fn verify(&mut self, pin: &str) -> VerifyOutcome {
		if self.attempts_left == 0 {
			return VerifyOutcome::LockedOut;
		}

		let digits = pin.chars().filter(char::is_ascii_digit).collect::<String>();

		if digits.is_empty() {
			return VerifyOutcome::Missing;
		}
		if constant_time_eq(&digest(&digits), &self.digest) {
			return VerifyOutcome::Verified;
		}

		self.attempts_left -= 1;

		match self.attempts_left {
			0 => VerifyOutcome::LockedOut,
			attempts_left => VerifyOutcome::Incorrect { attempts_left },
		}
	}

	/// Issues a replacement code once the cooldown has elapsed.
	pub fn resend(&mut self, now: OffsetDateTime) -> Result<TokenSecret, ResendError> {
		self.resend_with_rng(now, &mut rand::rng())
	}

	/// Same as [`Self::resend`] with a caller-provided RNG.
	pub fn resend_with_rng<R>(
		&mut self,
		now: OffsetDateTime,
		rng: &mut R,
	) -> Result<TokenSecret, ResendError>
	where
		R: Rng,
	{
		if self.attempts_left == 0 {
			return Err(ResendError::LockedOut);
		}

		let remaining = self.resend_cooldown(now);

		if remaining.is_positive() {
			return Err(ResendError::CoolingDown { remaining });
		}

		let code = generate_code(rng);

		self.digest = digest(code.expose());
		self.resend_available_at = now + Self::RESEND_COOLDOWN;

		Ok(code)
	}
}
impl Debug for SecondFactorChallenge {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SecondFactorChallenge")
			.field("email", &self.masked_email())
			.field("attempts_left", &self.attempts_left)
			.field("resend_available_at", &self.resend_available_at)
			.finish()
	}
}

/// Masks the local part of an address, keeping at most its first two characters.
pub fn mask_email(email: &str) -> String {
	if email.is_empty() {
		return "your email".into();
	}

	let (user, domain) = match email.split_once('@') {
		Some((user, domain)) => (user, Some(domain)),
		None => (email, None),
	};
	let keep = if user.chars().count() <= 2 { 1 } else { 2 };
	let visible = user.chars().take(keep).collect::<String>();

	match domain {
		Some(domain) => format!("{visible}••••@{domain}"),
		None => format!("{visible}••••"),
	}
}

fn generate_code<R>(rng: &mut R) -> TokenSecret
where
	R: Rng,
{
	TokenSecret::new(rng.random_range(100_000..1_000_000_u32).to_string())
}

fn digest(code: &str) -> [u8; 32] {
	Sha256::digest(code.as_bytes()).into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
	a.iter().zip(b.iter()).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn issue() -> (SecondFactorChallenge, TokenSecret, OffsetDateTime) {
		let now = macros::datetime!(2025-10-12 09:00 UTC);
		let (challenge, code) = SecondFactorChallenge::issue("alice@securebank.com", now);

		(challenge, code, now)
	}

	#[test]
	fn issued_code_is_six_digits() {
		let (_, code, _) = issue();

		assert_eq!(code.expose().len(), SecondFactorChallenge::CODE_LEN);
		assert!(code.expose().chars().all(|c| c.is_ascii_digit()));
		assert!(!code.expose().starts_with('0'));
	}

	#[test]
	fn verify_accepts_code_with_separators() {
		let (mut challenge, code, _) = issue();
		let spaced = format!("{} {}", &code.expose()[..3], &code.expose()[3..]);

		assert_eq!(challenge.verify(""), VerifyOutcome::Missing);
		assert_eq!(challenge.attempts_left(), 3);
		assert_eq!(challenge.verify(&spaced), VerifyOutcome::Verified);
	}

	#[test]
	fn three_wrong_pins_lock_the_challenge() {
		let (mut challenge, code, now) = issue();
		let wrong = if code.expose() == "123456" { "654321" } else { "123456" };

		assert_eq!(challenge.verify(wrong), VerifyOutcome::Incorrect { attempts_left: 2 });
		assert_eq!(challenge.verify(wrong), VerifyOutcome::Incorrect { attempts_left: 1 });
		assert_eq!(challenge.verify(wrong), VerifyOutcome::LockedOut);
		assert_eq!(challenge.verify(code.expose()), VerifyOutcome::LockedOut);
		assert_eq!(
			challenge.resend(now + Duration::minutes(5)).expect_err("Locked challenge."),
			ResendError::LockedOut
		);
	}

	#[test]
	fn resend_waits_for_cooldown_and_replaces_code() {
		let (mut challenge, old, now) = issue();
		let err = challenge
			.resend(now + Duration::seconds(10))
			.expect_err("Resend inside the cooldown should fail.");

		assert_eq!(err, ResendError::CoolingDown { remaining: Duration::seconds(20) });

		let later = now + Duration::seconds(30);
		let new = challenge.resend(later).expect("Resend after the cooldown should succeed.");

		assert_eq!(challenge.resend_cooldown(later), Duration::seconds(30));

		if new.expose() != old.expose() {
			assert!(matches!(challenge.verify(old.expose()), VerifyOutcome::Incorrect { .. }));
		}

		assert_eq!(challenge.verify(new.expose()), VerifyOutcome::Verified);
	}

	#[test]
	fn masking_matches_display_rules() {
		assert_eq!(mask_email("alice@securebank.com"), "al••••@securebank.com");
		assert_eq!(mask_email("al@securebank.com"), "a••••@securebank.com");
		assert_eq!(mask_email("nodomain"), "no••••");
		assert_eq!(mask_email(""), "your email");
	}
}
