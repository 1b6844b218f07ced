use amd_to_cjs::{convert_to_string, ConvertError};

const MIXED_INPUT: &str = r#"/** Top level comments shouldn’t be duplicated. */
define(function() {
  return 'hello world';
});

define(function(require) {
  var a = require('rjs-require');
  return a;
});

define({
  hello: 'world'
});

require(['alphabet', 'novar'], function(soup) {
  window.init();
  return soup.eatWith('spoon');
});
"#;

const MIXED_OUTPUT: &str = r#"/** Top level comments shouldn’t be duplicated. */
module.exports = 'hello world';

var a = require('rjs-require');
module.exports = a;

module.exports = {
  hello: 'world'
};

var soup = require('alphabet');
require('novar');
window.init();
module.exports = soup.eatWith('spoon');
"#;

#[test]
fn mixed_amd_forms() {
  assert_eq!(convert_to_string(MIXED_INPUT).unwrap(), MIXED_OUTPUT);
}

#[test]
fn converted_output_is_stable() {
  let once = convert_to_string(MIXED_INPUT).unwrap();
  assert_eq!(convert_to_string(&once).unwrap(), once);
}

#[test]
fn module_with_helpers_and_nested_require() {
  let src = r#"define(['jquery', 'lodash', 'polyfill'], function($, _) {
  'use strict';

  var cache = {};

  function lookup(key) {
    if (!(key in cache)) {
      return null;
    }
    return cache[key];
  }

  require(['analytics'], function(analytics) {
    analytics.track('load');
  });

  return {
    lookup: lookup,
    render: function(el) {
      return $(el).html(_.escape(lookup('tpl')));
    }
  };
});
"#;
  let expected = r#"'use strict';
var $ = require('jquery');
var _ = require('lodash');
require('polyfill');
var cache = {};

function lookup(key) {
  if (!(key in cache)) {
    return null;
  }
  return cache[key];
}

var analytics = require('analytics');
analytics.track('load');

module.exports = {
  lookup: lookup,
  render: function(el) {
    return $(el).html(_.escape(lookup('tpl')));
  }
};
"#;
  assert_eq!(convert_to_string(src).unwrap(), expected);
}

#[test]
fn dependency_list_declared_later_in_file() {
  let src = r#"require(deps, function(a) {
  a.start();
});

var deps = ['app'];
"#;
  let expected = r#"var a = require('app');
a.start();

var deps = ['app'];
"#;
  assert_eq!(convert_to_string(src).unwrap(), expected);
}

#[test]
fn dependency_list_bound_to_non_array_is_unresolved() {
  let err = convert_to_string("var deps = load();\nrequire(deps, function(a) {});").unwrap_err();
  assert!(matches!(
    err,
    ConvertError::UnresolvedDependencies { ref name, offset: 27 } if name == "deps"
  ));
}
