//! Publication status and modification dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::Result;
use crate::model::{Literal, NodeKinds, Term};
use crate::projection::{objects_for, LookupOptions};
use crate::resolver::Resolver;
use crate::vocab::{DCT_DATE, XSD_DATE, XSD_DATE_TIME};

/// Parses an `xsd:date` or `xsd:dateTime` literal as a UTC timestamp.
///
/// Dates without a time are midnight; date-times without a zone are UTC.
#[must_use]
pub fn parse_date(literal: &Literal) -> Option<DateTime<Utc>> {
    let lex = literal.lexical().trim();
    match literal.datatype() {
        XSD_DATE_TIME => DateTime::parse_from_rfc3339(lex)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(lex, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|ndt| Utc.from_utc_datetime(&ndt))
            }),
        XSD_DATE => {
            let day = lex.get(..10)?;
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
                .map(|ndt| Utc.from_utc_datetime(&ndt))
        }
        _ => None,
    }
}

impl Resolver<'_> {
    /// Returns true if `subject` carries a published status and is not
    /// retired, per the configured [`PublicationPolicy`](crate::PublicationPolicy).
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn is_published(&self, subject: &Term) -> Result<bool> {
        let policy = &self.config().publication;
        let statuses = objects_for(
            self.graph(),
            self.facts(),
            subject,
            std::slice::from_ref(&policy.status_predicate),
            &LookupOptions::kinds(NodeKinds::RESOURCE),
        )?;
        Ok(policy.is_published(&statuses))
    }

    /// Dates of `subject` (`dct:date` and its subproperties), ascending.
    ///
    /// Literals that are not well-formed `xsd:date`/`xsd:dateTime` values
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn dates_for(&self, subject: &Term) -> Result<Vec<DateTime<Utc>>> {
        let literals = objects_for(
            self.graph(),
            self.facts(),
            subject,
            &[Term::iri(DCT_DATE)],
            &LookupOptions::literals(&[XSD_DATE, XSD_DATE_TIME]),
        )?;
        let mut dates: Vec<DateTime<Utc>> = literals
            .iter()
            .filter_map(Term::as_literal)
            .filter_map(|lit| {
                let parsed = parse_date(lit);
                if parsed.is_none() {
                    tracing::trace!(value = lit.lexical(), "unparseable date skipped");
                }
                parsed
            })
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    /// The latest date of `subject`, or the minimum timestamp.
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn mtime_of(&self, subject: &Term) -> Result<DateTime<Utc>> {
        Ok(self
            .dates_for(subject)?
            .last()
            .copied()
            .unwrap_or(DateTime::<Utc>::MIN_UTC))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_both_datatypes() {
        let d = parse_date(&Literal::typed("2020-02-03", XSD_DATE)).expect("date");
        assert_eq!((d.year(), d.month(), d.day()), (2020, 2, 3));
        let dt = parse_date(&Literal::typed("2020-02-03T04:05:06+02:00", XSD_DATE_TIME))
            .expect("datetime");
        assert_eq!(dt.to_rfc3339(), "2020-02-03T02:05:06+00:00");
        let naive = parse_date(&Literal::typed("2020-02-03T04:05:06", XSD_DATE_TIME));
        assert!(naive.is_some());
        assert!(parse_date(&Literal::typed("soon", XSD_DATE)).is_none());
        assert!(parse_date(&Literal::simple("2020-02-03")).is_none());
    }
}
