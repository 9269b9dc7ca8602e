macro_rules! token_parser_no_span {
	($ty:ty) => {
		impl chumsky::Parser<$crate::lexer::Token, $ty, Error = $crate::parser::error::SyntaxError>
	};
}

macro_rules! token_parser {
	($ty:ty) => {
		token_parser_no_span!($crate::common::span::Spanned<$ty>)
	};
}

macro_rules! span {
	($x:expr) => {
		$x.map_with_span(|x, s| $crate::common::span::AddSpan::add_span(x, s))
	};
}

macro_rules! token_gen {
	($name:ident, $jname:ident => $ident:ident) => {
		macro_rules! $name {
			($var:ident) => {
				$crate::lexer::Token::$ident($crate::lexer::$ident::$var)
			};
		}
		macro_rules! $jname {
			($var:ident) => {
				chumsky::primitive::just($name!($var))
			};
		}
	};
}

token_gen!(punct, jpunct => Punctuation);

macro_rules! parened {
	($arg:expr) => {
		$arg.delimited_by(jpunct!(LParen), jpunct!(RParen))
	};
}
