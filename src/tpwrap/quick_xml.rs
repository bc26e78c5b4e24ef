// `quick-xml` wrappers
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of replayc.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Reader errors from [`quick_xml`].

use std::fmt::Display;

/// Thin wrapper around [`quick_xml::Error`] so that reader errors may
///   derive [`PartialEq`].
///
/// [`quick_xml::Error`] does not implement [`PartialEq`],
///   so two wrapped errors never compare equal.
#[derive(Debug)]
pub struct XmlError(pub quick_xml::Error);

impl PartialEq for XmlError {
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

// Accepts the assorted error types of `quick-xml` (attribute, encoding,
//   and escape errors) for which it provides conversions.
impl<E: Into<quick_xml::Error>> From<E> for XmlError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quick_xml::events::attributes::AttrError;

    #[test]
    fn never_equal() {
        let a = XmlError::from(AttrError::ExpectedEq(0));
        let b = XmlError::from(AttrError::ExpectedEq(0));

        assert_ne!(a, b);
    }

    #[test]
    fn displays_inner_error() {
        let inner = quick_xml::Error::from(AttrError::ExpectedEq(4));
        let expected = inner.to_string();

        assert_eq!(XmlError(inner).to_string(), expected);
    }
}
