//! Dynamic header injection into the message property bag.

// self
use crate::{
	audit::Diagnostics,
	error::PropertyInjectionError,
	message::{MessagePropertyKey, ModuleMessage},
	token::Secret,
};

/// Writes `value` into the message under `key`.
///
/// A rejection from the message is surfaced as [`PropertyInjectionError`] and must end the
/// invocation; it is never swallowed. The debug entry names the property but not the value.
pub fn set_property<M>(
	message: &mut M,
	key: MessagePropertyKey,
	value: &Secret,
	diagnostics: &Diagnostics<'_>,
) -> Result<(), PropertyInjectionError>
where
	M: ?Sized + ModuleMessage,
{
	message
		.set_message_property(key.clone(), value.expose())
		.map_err(|source| PropertyInjectionError { key: key.clone(), source })?;

	diagnostics.debug(format_args!(
		"Setting dynamic header: \"{}\" ({}).",
		key.name, key.namespace
	));

	Ok(())
}
