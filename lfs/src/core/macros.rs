///
/// Build an ordered filter list from anything implementing `Filter`, for use
/// as a configured fetch, upload or delete sequence.
///
/// ```ignore
/// let mut config = Configuration::new("/srv/lfs");
/// config.fetch_filters = filters![profile, cors];
/// ```
///
#[macro_export]
macro_rules! filters {
  () => {
      ::std::vec::Vec::<::std::boxed::Box<dyn $crate::Filter>>::new()
  };
  [ $( $x:expr ),+ $(,)? ] => {{
      let filters: ::std::vec::Vec<::std::boxed::Box<dyn $crate::Filter>> = vec![
          $( ::std::boxed::Box::new($x) as ::std::boxed::Box<dyn $crate::Filter> ),+
      ];

      filters
  }};
}
