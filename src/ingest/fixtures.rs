//! Representative USGS IV API response payloads for tests.
//!
//! Trimmed from real responses: `sourceInfo` and `variable` keep only the
//! fields the parser reads, plus enough surrounding noise to make sure
//! unknown fields are ignored.

/// Madison below Hebgen: discharge (two points), stage, and water temp.
pub const MADISON_ALL_PARAMS: &str = r#"{
  "name": "ns1:timeSeriesResponseType",
  "value": {
    "queryInfo": { "queryURL": "http://waterservices.usgs.gov/nwis/iv/format=json&sites=06038500" },
    "timeSeries": [
      {
        "sourceInfo": {
          "siteName": "MADISON RIVER BL HEBGEN LAKE NR GRAYLING MT",
          "siteCode": [{ "value": "06038500", "network": "NWIS", "agencyCode": "USGS" }]
        },
        "variable": {
          "variableCode": [{ "value": "00060", "network": "NWIS" }],
          "unit": { "unitCode": "ft3/s" },
          "noDataValue": -999999.0
        },
        "values": [{
          "value": [
            { "value": "905", "qualifiers": ["P"], "dateTime": "2024-05-01T12:15:00.000-06:00" },
            { "value": "912", "qualifiers": ["P"], "dateTime": "2024-05-01T12:30:00.000-06:00" }
          ]
        }],
        "name": "USGS:06038500:00060:00000"
      },
      {
        "sourceInfo": {
          "siteName": "MADISON RIVER BL HEBGEN LAKE NR GRAYLING MT",
          "siteCode": [{ "value": "06038500" }]
        },
        "variable": {
          "variableCode": [{ "value": "00065" }],
          "noDataValue": -999999.0
        },
        "values": [{
          "value": [
            { "value": "2.41", "qualifiers": ["P"], "dateTime": "2024-05-01T12:30:00.000-06:00" }
          ]
        }]
      },
      {
        "sourceInfo": {
          "siteName": "MADISON RIVER BL HEBGEN LAKE NR GRAYLING MT",
          "siteCode": [{ "value": "06038500" }]
        },
        "variable": {
          "variableCode": [{ "value": "00010" }],
          "noDataValue": -999999.0
        },
        "values": [{
          "value": [
            { "value": "10.5", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-06:00" }
          ]
        }]
      }
    ]
  }
}"#;

/// Discharge reported as the no-data sentinel; stage unparseable.
pub const SENTINEL_DISCHARGE: &str = r#"{
  "value": {
    "timeSeries": [
      {
        "sourceInfo": { "siteName": "ICED GAUGE", "siteCode": [{ "value": "01426500" }] },
        "variable": { "variableCode": [{ "value": "00060" }], "noDataValue": -999999.0 },
        "values": [{ "value": [
          { "value": "-999999", "qualifiers": ["P", "Ice"], "dateTime": "2024-01-10T08:00:00.000-05:00" }
        ] }]
      },
      {
        "sourceInfo": { "siteName": "ICED GAUGE", "siteCode": [{ "value": "01426500" }] },
        "variable": { "variableCode": [{ "value": "00065" }], "noDataValue": -999999.0 },
        "values": [{ "value": [
          { "value": "Eqp", "qualifiers": ["P"], "dateTime": "2024-01-10T08:00:00.000-05:00" }
        ] }]
      }
    ]
  }
}"#;

/// A dry channel reporting exactly zero discharge.
pub const ZERO_DISCHARGE: &str = r#"{
  "value": {
    "timeSeries": [
      {
        "sourceInfo": { "siteName": "DRY WASH", "siteCode": [{ "value": "09380000" }] },
        "variable": { "variableCode": [{ "value": "00060" }], "noDataValue": -999999.0 },
        "values": [{ "value": [
          { "value": "0.00", "qualifiers": ["P"], "dateTime": "2024-08-20T14:00:00.000-07:00" }
        ] }]
      }
    ]
  }
}"#;

/// Series exists but carries no values.
pub const EMPTY_VALUES: &str = r#"{
  "value": {
    "timeSeries": [
      {
        "sourceInfo": { "siteName": "SEASONAL GAUGE", "siteCode": [{ "value": "14092500" }] },
        "variable": { "variableCode": [{ "value": "00060" }], "noDataValue": -999999.0 },
        "values": [{ "value": [] }]
      }
    ]
  }
}"#;

/// Two sites in one response, Yellowstone listed first.
pub const TWO_SITES: &str = r#"{
  "value": {
    "timeSeries": [
      {
        "sourceInfo": { "siteName": "YELLOWSTONE RIVER AT CORWIN SPRINGS MT", "siteCode": [{ "value": "06191500" }] },
        "variable": { "variableCode": [{ "value": "00060" }], "noDataValue": -999999.0 },
        "values": [{ "value": [
          { "value": "3480", "qualifiers": ["P"], "dateTime": "2024-05-01T12:30:00.000-06:00" }
        ] }]
      },
      {
        "sourceInfo": { "siteName": "MADISON RIVER BL HEBGEN LAKE NR GRAYLING MT", "siteCode": [{ "value": "06038500" }] },
        "variable": { "variableCode": [{ "value": "00060" }], "noDataValue": -999999.0 },
        "values": [{ "value": [
          { "value": "905", "qualifiers": ["P"], "dateTime": "2024-05-01T12:30:00.000-06:00" }
        ] }]
      }
    ]
  }
}"#;
